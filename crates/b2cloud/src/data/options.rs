use std::fmt;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::progress::ProgressCallback;

/// Inclusive byte range of an object, `bytes=<start>-<end>` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self { Self { start, end } }

    /// Number of bytes covered by the range, `None` if `start > end`.
    #[must_use]
    pub fn len(&self) -> Option<u64> {
        self.end.checked_sub(self.start).map(|span| span + 1)
    }
}

/// Options for [`crate::Client::download_file_with`].
///
/// # Examples
///
/// ```
/// use b2cloud::{ByteRange, DownloadOptions};
///
/// let options = DownloadOptions::default()
///     .range(ByteRange::new(0, 99))
///     .atomic(false);
/// ```
#[derive(Clone)]
pub struct DownloadOptions {
    /// Retrieve only this range; `None` downloads the full object.
    pub range: Option<ByteRange>,

    /// Stream into a sibling staging file and rename it onto the destination
    /// once the body completes. The staging file is removed on failure.
    ///
    /// When `false`, bytes are written straight to the destination and a
    /// failed transfer leaves a partial file behind.
    ///
    /// Default: true
    pub atomic: bool,

    /// Check full downloads against the `X-Bz-Content-Sha1` response header.
    /// Ignored for range requests.
    ///
    /// Default: true
    pub verify: bool,

    pub on_progress: Option<ProgressCallback>,
}

impl fmt::Debug for DownloadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadOptions")
            .field("range", &self.range)
            .field("atomic", &self.atomic)
            .field("verify", &self.verify)
            .field("on_progress", &"{ ... }")
            .finish()
    }
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            range: None,
            atomic: true,
            verify: true,
            on_progress: None,
        }
    }
}

impl DownloadOptions {
    #[must_use]
    pub fn range(mut self, range: ByteRange) -> Self {
        self.range = Some(range);
        self
    }

    #[must_use]
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    #[must_use]
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    #[must_use]
    pub fn on_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }
}

/// Options for [`crate::Client::upload_file_with`].
#[derive(Clone, Default)]
pub struct UploadOptions {
    pub on_progress: Option<ProgressCallback>,
}

impl fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadOptions")
            .field("on_progress", &"{ ... }")
            .finish()
    }
}

impl UploadOptions {
    #[must_use]
    pub fn on_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }
}

/// Cancellation and deadline applied to every operation of a client view.
///
/// See [`crate::Client::with_call_options`].
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub cancel: Option<CancellationToken>,
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
