use std::io;
use std::path::PathBuf;

/// Streamed content did not hash to the expected digest.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },
}

/// Failure while computing the digest of a local file.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HashError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            HashError::Io { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, VerificationError>;
