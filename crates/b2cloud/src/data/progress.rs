use std::fmt;
use std::sync::Arc;

/// Phases of a transfer.
///
/// Transfers progress through these phases in order:
/// Connecting → Transferring → Verifying → Committing → Completed
///
/// Uploads skip Verifying and Committing; the service verifies the hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferPhase {
    /// Request sent, waiting for the response headers (download) or for
    /// the hash, size and upload URL to resolve (upload).
    #[default]
    Connecting,

    /// Body bytes are streaming.
    Transferring,

    /// Comparing the streamed bytes against the advertised SHA-1.
    Verifying,

    /// Moving the staging file onto the destination path.
    Committing,

    /// Terminal state for successful transfers.
    Completed,
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferPhase::Connecting => write!(f, "Connecting"),
            TransferPhase::Transferring => write!(f, "Transferring"),
            TransferPhase::Verifying => write!(f, "Verifying"),
            TransferPhase::Committing => write!(f, "Committing"),
            TransferPhase::Completed => write!(f, "Completed"),
        }
    }
}

/// Snapshot passed to progress callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    pub phase: TransferPhase,

    /// Bytes sent or written so far.
    pub bytes_transferred: u64,

    /// Total expected bytes, if known from the file size or Content-Length.
    pub total_bytes: Option<u64>,
}

impl Progress {
    /// Percentage of completion, `None` if the total is unknown.
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        self.total_bytes.map(|total| {
            if total == 0 {
                if self.is_completed() { 100.0 } else { 0.0 }
            } else {
                (self.bytes_transferred as f64 / total as f64) * 100.0
            }
        })
    }

    #[must_use]
    pub fn is_completed(&self) -> bool { self.phase == TransferPhase::Completed }
}

pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;

pub(crate) fn report(callback: Option<&ProgressCallback>, progress: Progress) {
    if let Some(callback) = callback {
        callback(&progress);
    }
}
