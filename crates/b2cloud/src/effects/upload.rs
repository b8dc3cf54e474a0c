use std::future::Future;
use std::path::Path;

use futures_util::StreamExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use crate::core;
use crate::data::progress::report;
use crate::data::{FileInfo, Progress, TransferPhase, UploadOptions, UploadTicket};
use crate::effects::http::{HttpClient, UploadBody};
use crate::error::{Error, Result};

/// Upload the file at `path` under its base name.
///
/// The upload ticket, the file size and the SHA-1 digest are obtained
/// concurrently; the first failure among them aborts the upload before any
/// byte is sent. The body is then streamed from a second read of the file.
pub(crate) async fn upload_file<C, T>(
    http: &C,
    ticket: T,
    path: &Path,
    options: &UploadOptions,
) -> Result<FileInfo>
where
    C: HttpClient,
    T: Future<Output = Result<UploadTicket>>,
{
    let file_name = core::upload_file_name(path)?;
    let on_progress = options.on_progress.as_ref();

    report(on_progress, Progress::default());

    let size = async {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.len())
            .map_err(|e| Error::io(path, e))
    };
    let digest = async { Ok::<_, Error>(b2cloud_verify::hash_file(path).await?) };
    let (ticket, size, sha1) = tokio::try_join!(ticket, size, digest)?;
    debug!(file = %file_name, size, %sha1, "upload prepared");

    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| Error::io(path, e))?;
    let callback = options.on_progress.clone();
    let mut sent = 0u64;
    let chunks = ReaderStream::with_capacity(file, b2cloud_verify::READ_CHUNK_SIZE).map(move |chunk| {
        if let Ok(bytes) = &chunk {
            sent += bytes.len() as u64;
            report(
                callback.as_ref(),
                Progress {
                    phase: TransferPhase::Transferring,
                    bytes_transferred: sent,
                    total_bytes: Some(size),
                },
            );
        }
        chunk
    });
    let body: UploadBody = Box::pin(chunks);

    let headers = [
        ("Authorization".to_string(), ticket.authorization_token.clone()),
        ("X-Bz-File-Name".to_string(), core::encode_file_name(&file_name)),
        ("Content-Type".to_string(), core::AUTO_CONTENT_TYPE.to_string()),
        ("Content-Length".to_string(), size.to_string()),
        ("X-Bz-Content-Sha1".to_string(), sha1),
    ];

    let response = http
        .post_stream(&ticket.upload_url, &headers, body)
        .await
        .map_err(Error::network)?;

    if response.status != 200 {
        warn!(file = %file_name, status = response.status, "upload rejected");
        return Err(Error::Upload {
            status: response.status,
            body: core::body_text(&response.body),
        });
    }

    let info: FileInfo = serde_json::from_slice(&response.body)?;
    info!(file = %info.file_name, file_id = %info.file_id, size, "uploaded file");
    report(
        on_progress,
        Progress {
            phase: TransferPhase::Completed,
            bytes_transferred: size,
            total_bytes: Some(size),
        },
    );
    Ok(info)
}
