//! Client core for the Backblaze B2 object-storage API.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable wire records, options and configuration
//! - [`core`] - Pure transformations (URLs, headers, ranges, expiry)
//! - [`effects`] - I/O operations with trait abstraction
//!
//! [`Client`] ties the layers together.
//!
//! # Key Features
//!
//! - **Cached Authorization**: one login per token lifetime, shared by
//!   concurrent callers
//! - **Bucket Resolution**: names map to ids through a cached listing that is
//!   refreshed whole on a miss
//! - **Streaming Upload**: size, SHA-1 and upload target resolve concurrently,
//!   then the file streams without being buffered
//! - **Streaming Download**: optional byte ranges, staging file with atomic
//!   rename, SHA-1 check of full downloads
//!
//! # Example
//!
//! ```no_run
//! use b2cloud::{BucketType, Client, ClientConfig};
//!
//! # async fn run() -> b2cloud::Result<()> {
//! let client = Client::new(ClientConfig::new("account-id", "application-key"))?;
//! let bucket = client.create_bucket("my-bucket", BucketType::AllPrivate).await?;
//! let info = client.upload_file("report.pdf", &bucket.bucket_name).await?;
//! println!("uploaded {} as {}", info.file_name, info.file_id);
//! # Ok(())
//! # }
//! ```

mod client;
pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use client::Client;
pub use data::{
    Authorization, Bucket, BucketType, ByteRange, CallOptions, ClientConfig, Credentials,
    DeletedFileVersion, DownloadHeaders, DownloadOptions, FileInfo, FileNameListing,
    ListFilesOptions, Progress, ProgressCallback, TransferPhase, UploadOptions, UploadTicket,
};
pub use effects::{BoxStream, HeaderList, HttpClient, HttpResponse, StreamingResponse, UploadBody};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{Error, Result};

pub use b2cloud_verify as verify;
pub use tokio_util::sync::CancellationToken;
