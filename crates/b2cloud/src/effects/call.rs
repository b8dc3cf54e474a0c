use std::future::Future;

use crate::data::CallOptions;
use crate::error::{Error, Result};

/// Run `operation` under the deadline and cancellation token of `options`.
///
/// Cancellation wins over completion when both are ready.
pub(crate) async fn guarded<T>(
    options: &CallOptions,
    operation: impl Future<Output = Result<T>>,
) -> Result<T> {
    let bounded = async {
        match options.timeout {
            Some(limit) => tokio::time::timeout(limit, operation)
                .await
                .map_err(|_| Error::Timeout)?,
            None => operation.await,
        }
    };

    match &options.cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(Error::Cancelled),
            result = bounded => result,
        },
        None => bounded.await,
    }
}
