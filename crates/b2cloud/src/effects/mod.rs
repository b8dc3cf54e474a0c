//! Side-effecting operations for the b2cloud client.
//!
//! Everything that touches the network or the filesystem lives here, behind
//! the [`HttpClient`] trait so tests can substitute an in-memory service.

pub(crate) mod api;
pub(crate) mod auth;
pub(crate) mod bucket;
pub(crate) mod cache;
pub(crate) mod call;
pub(crate) mod download;
pub(crate) mod file;
pub mod http;
pub(crate) mod upload;

pub use http::{BoxStream, HeaderList, HttpClient, HttpResponse, StreamingResponse, UploadBody};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
