use std::io;
use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{HashError, Hasher};

/// Chunk size used for single-pass hashing reads.
pub const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Drain `reader` through `hasher` and return the raw digest.
pub async fn hash_reader<R, H>(mut reader: R, mut hasher: H) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
    H: Hasher,
{
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}

/// Compute the lower-case hex SHA-1 of the file at `path`.
///
/// The file is opened here and read once, start to finish. Any open or read
/// failure is reported as [`HashError::Io`] and no digest is produced.
#[cfg(feature = "sha1")]
pub async fn hash_file(path: impl AsRef<Path>) -> Result<String, HashError> {
    let path = path.as_ref();
    let io_err = |source| HashError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(io_err)?;
    let digest = hash_reader(file, crate::Sha1Hasher::new())
        .await
        .map_err(io_err)?;
    Ok(hex::encode(digest))
}
