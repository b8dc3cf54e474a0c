//! Immutable data types for the b2cloud client.
//!
//! Wire records, transfer options, progress snapshots and configuration.
//! Nothing in this module performs I/O.

pub mod auth;
pub mod bucket;
pub mod config;
pub mod file;
pub mod headers;
pub mod options;
pub mod progress;

pub use auth::{Authorization, Credentials};
pub use bucket::{Bucket, BucketType};
pub use config::{ClientConfig, DEFAULT_AUTH_URL, DEFAULT_TOKEN_TTL_SECS};
pub use file::{DeletedFileVersion, FileInfo, FileNameListing, ListFilesOptions, UploadTicket};
pub use headers::DownloadHeaders;
pub use options::{ByteRange, CallOptions, DownloadOptions, UploadOptions};
pub use progress::{Progress, ProgressCallback, TransferPhase};
