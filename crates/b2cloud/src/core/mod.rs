//! Pure transformations for the b2cloud client.
//!
//! URL and header construction, range formatting, expiry arithmetic and
//! error-body decoding. No I/O happens here.

mod endpoint;
mod expiry;
mod range;
mod status;

pub use endpoint::{
    API_PREFIX, AUTO_CONTENT_TYPE, api_url, basic_auth, download_url, encode_file_name,
    upload_file_name,
};
pub use expiry::{expires_after, is_fresh};
pub use range::range_header;
pub use status::{ApiErrorBody, api_error, body_text, error_message, is_success};
