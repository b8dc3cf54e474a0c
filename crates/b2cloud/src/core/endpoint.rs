use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use url::Url;

use crate::error::{Error, Result};

/// Path prefix of every v1 API operation.
pub const API_PREFIX: &str = "/b2api/v1/";

/// Content type sent with uploads; the service sniffs the real type.
pub const AUTO_CONTENT_TYPE: &str = "b2/x-auto";

/// Build the URL of an API operation, e.g. `b2_list_buckets`.
///
/// ```
/// use b2cloud::core::api_url;
///
/// assert_eq!(
///     api_url("https://api001.backblazeb2.com/", "b2_list_buckets"),
///     "https://api001.backblazeb2.com/b2api/v1/b2_list_buckets"
/// );
/// ```
pub fn api_url(api_base: &str, operation: &str) -> String {
    format!("{}{API_PREFIX}{operation}", api_base.trim_end_matches('/'))
}

/// Build `<download_base>/file/<bucket>/<file_name>`.
///
/// Each path segment is percent-encoded; `/` inside `file_name` keeps its
/// meaning as a folder separator.
pub fn download_url(download_base: &str, bucket_name: &str, file_name: &str) -> Result<String> {
    let mut url = Url::parse(download_base)
        .map_err(|e| Error::InvalidUrl(format!("{download_base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| Error::InvalidUrl(download_base.to_string()))?
        .pop_if_empty()
        .push("file")
        .push(bucket_name)
        .extend(file_name.split('/'));
    Ok(url.into())
}

/// `Authorization` header value for the login call.
pub fn basic_auth(account_id: &str, application_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{account_id}:{application_key}")))
}

/// Encode a file name for the `X-Bz-File-Name` header.
///
/// Spaces become `%20` rather than `+`.
pub fn encode_file_name(name: &str) -> String {
    url::form_urlencoded::byte_serialize(name.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Destination file name of an upload: the final component of `path`.
pub fn upload_file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))
}
