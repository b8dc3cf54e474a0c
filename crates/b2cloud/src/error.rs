//! Error types for b2cloud.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("authorization failed (HTTP {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    #[error("upload rejected (HTTP {status}): {body}")]
    Upload { status: u16, body: String },

    #[error("download failed (HTTP {status}): {body}")]
    Download { status: u16, body: String },

    #[error("API error (HTTP {status}, {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Hash(#[from] b2cloud_verify::HashError),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("path has no file name: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("invalid byte range {start}-{end}")]
    InvalidRange { start: u64, end: u64 },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation timed out")]
    Timeout,
}

impl Error {
    pub(crate) fn network<E: std::error::Error>(e: E) -> Self { Error::Network(e.to_string()) }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status reported by the service, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth { status, .. }
            | Error::Upload { status, .. }
            | Error::Download { status, .. }
            | Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<b2cloud_verify::VerificationError> for Error {
    fn from(e: b2cloud_verify::VerificationError) -> Self {
        match e {
            b2cloud_verify::VerificationError::Mismatch { expected, actual } => {
                Error::ChecksumMismatch { expected, actual }
            }
        }
    }
}

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self { Error::Config(Box::new(e)) }
}

pub type Result<T> = std::result::Result<T, Error>;
