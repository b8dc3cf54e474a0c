use std::path::{Path, PathBuf};

use b2cloud_verify::{Sha1Hasher, StreamVerifier};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core;
use crate::data::progress::report;
use crate::data::{
    Authorization, DownloadHeaders, DownloadOptions, Progress, ProgressCallback, TransferPhase,
};
use crate::effects::http::{BoxStream, HttpClient};
use crate::error::{Error, Result};

/// Sibling file a download streams into before it is renamed into place.
///
/// Failed downloads remove it with [`Staging::discard`]. Drop is the fallback
/// for a download future that is dropped mid-transfer, where no await is
/// possible and the unlink is synchronous.
struct Staging {
    path: PathBuf,
    committed: bool,
}

impl Staging {
    fn beside(destination: &Path) -> Self {
        let dir = destination.parent().unwrap_or_else(|| Path::new("."));
        Self {
            path: dir.join(format!(".tmp.{}.b2part", uuid::Uuid::new_v4())),
            committed: false,
        }
    }

    async fn commit(mut self, destination: &Path) -> Result<()> {
        tokio::fs::rename(&self.path, destination)
            .await
            .map_err(|e| Error::io(destination, e))?;
        self.committed = true;
        Ok(())
    }

    async fn discard(mut self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            debug!(path = %self.path.display(), error = %e, "staging file not removed");
        }
        self.committed = true;
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// SHA-1 the service advertises for the whole object, if it is a real digest.
///
/// Large-file uploads report `none` or an `unverified:` prefixed value.
fn advertised_sha1(headers: &[(String, String)]) -> Option<String> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("x-bz-content-sha1"))
        .map(|(_, value)| value.trim())
        .filter(|value| value.len() == 40 && value.bytes().all(|b| b.is_ascii_hexdigit()))
        .map(str::to_ascii_lowercase)
}

fn content_length(headers: &[(String, String)]) -> Option<u64> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// Stream `body` into `target`, then check it against `verifier` if given.
async fn write_body<E: std::error::Error>(
    target: &Path,
    body: &mut BoxStream<'static, std::result::Result<bytes::Bytes, E>>,
    mut verifier: Option<StreamVerifier<Sha1Hasher>>,
    on_progress: Option<&ProgressCallback>,
    total_bytes: Option<u64>,
) -> Result<u64> {
    let mut file = tokio::fs::File::create(target)
        .await
        .map_err(|e| Error::io(target, e))?;
    let mut bytes_written = 0u64;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(Error::network)?;
        if let Some(verifier) = verifier.as_mut() {
            verifier.update(&chunk);
        }
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::io(target, e))?;
        bytes_written += chunk.len() as u64;
        report(
            on_progress,
            Progress {
                phase: TransferPhase::Transferring,
                bytes_transferred: bytes_written,
                total_bytes,
            },
        );
    }
    file.flush().await.map_err(|e| Error::io(target, e))?;
    drop(file);

    if let Some(verifier) = verifier {
        report(
            on_progress,
            Progress {
                phase: TransferPhase::Verifying,
                bytes_transferred: bytes_written,
                total_bytes,
            },
        );
        verifier.finish()?;
    }
    Ok(bytes_written)
}

/// Download `bucket_name/file_name` to `save_path` and return the response
/// headers.
pub(crate) async fn download_file<C: HttpClient>(
    http: &C,
    auth: &Authorization,
    bucket_name: &str,
    file_name: &str,
    save_path: &Path,
    options: &DownloadOptions,
) -> Result<DownloadHeaders> {
    let destination = std::path::absolute(save_path).map_err(|e| Error::io(save_path, e))?;
    if destination.file_name().is_none() {
        return Err(Error::InvalidPath(destination));
    }

    let mut headers = vec![("Authorization".to_string(), auth.authorization_token.clone())];
    if let Some(range) = options.range {
        headers.push(("Range".to_string(), core::range_header(range)?));
    }
    let url = core::download_url(&auth.download_url, bucket_name, file_name)?;
    let on_progress = options.on_progress.as_ref();

    report(on_progress, Progress::default());
    debug!(%url, range = ?options.range, "requesting download");

    let response = http.get_stream(&url, &headers).await.map_err(Error::network)?;
    let status = response.status;
    let response_headers = response.headers;
    let mut body = response.body;

    if !core::is_success(status) {
        let mut text = Vec::new();
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) => text.extend_from_slice(&bytes),
                Err(_) => break,
            }
        }
        warn!(file = file_name, bucket = bucket_name, status, "download rejected");
        return Err(Error::Download {
            status,
            body: core::body_text(&text),
        });
    }

    let total_bytes = content_length(&response_headers);
    let expected_sha1 = if options.verify && options.range.is_none() && status == 200 {
        advertised_sha1(&response_headers)
    } else {
        None
    };

    let staging = options.atomic.then(|| Staging::beside(&destination));
    let target = staging.as_ref().map_or(destination.as_path(), |s| s.path.as_path());
    let verifier = expected_sha1.map(|expected| StreamVerifier::new(Sha1Hasher::new(), expected));

    let bytes_written = match write_body(target, &mut body, verifier, on_progress, total_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            if let Some(staging) = staging {
                staging.discard().await;
            }
            if matches!(e, Error::ChecksumMismatch { .. }) {
                warn!(file = file_name, error = %e, "downloaded content does not match its SHA-1");
            }
            return Err(e);
        }
    };

    if let Some(staging) = staging {
        report(
            on_progress,
            Progress {
                phase: TransferPhase::Committing,
                bytes_transferred: bytes_written,
                total_bytes,
            },
        );
        staging.commit(&destination).await?;
    }

    info!(
        file = file_name,
        bucket = bucket_name,
        path = %destination.display(),
        bytes = bytes_written,
        status,
        "downloaded file"
    );
    report(
        on_progress,
        Progress {
            phase: TransferPhase::Completed,
            bytes_transferred: bytes_written,
            total_bytes,
        },
    );

    Ok(DownloadHeaders {
        status,
        headers: response_headers,
        bytes_written,
        path: destination,
    })
}
