//! Content hashing and verification primitives for b2cloud transfers.
//!
//! Provides incremental hashing without enforcing a verification policy. The
//! service addresses content by SHA-1, so [`Sha1Hasher`] and [`hash_file`] are
//! enabled by default.
//!
//! # Key Features
//!
//! - **Single pass**: files are read once, start to finish, no seeking
//! - **Incremental**: digests are computed as data streams through
//! - **Extensible**: minimal `Hasher` trait allows custom implementations
//!
//! # Example
//!
//! ```
//! use b2cloud_verify::{Sha1Hasher, StreamVerifier};
//!
//! let data = b"hello world";
//! let expected = Sha1Hasher::digest_hex(data);
//!
//! let mut verifier = StreamVerifier::new(Sha1Hasher::new(), expected);
//! for chunk in data.chunks(4) {
//!     verifier.update(chunk);
//! }
//!
//! verifier.finish().unwrap();
//! ```

pub use self::error::{HashError, Result, VerificationError};
pub use self::file::{READ_CHUNK_SIZE, hash_reader};
pub use self::hasher::Hasher;
pub use self::verifier::StreamVerifier;

#[cfg(feature = "sha1")]
pub use self::file::hash_file;
#[cfg(feature = "sha1")]
pub use self::hasher::Sha1Hasher;

mod error;
mod file;
mod hasher;
mod verifier;
