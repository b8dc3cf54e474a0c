use std::path::PathBuf;

/// Response headers of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadHeaders {
    pub status: u16,

    /// Header pairs in arrival order, names lower-cased.
    pub headers: Vec<(String, String)>,

    /// Bytes written to [`DownloadHeaders::path`].
    pub bytes_written: u64,

    /// Absolute path of the written file.
    pub path: PathBuf,
}

impl DownloadHeaders {
    /// First value of the header `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_length(&self) -> Option<u64> {
        self.get("content-length").and_then(|v| v.parse().ok())
    }

    pub fn content_type(&self) -> Option<&str> { self.get("content-type") }

    pub fn content_range(&self) -> Option<&str> { self.get("content-range") }

    pub fn file_id(&self) -> Option<&str> { self.get("x-bz-file-id") }

    pub fn file_name(&self) -> Option<&str> { self.get("x-bz-file-name") }

    pub fn content_sha1(&self) -> Option<&str> { self.get("x-bz-content-sha1") }

    /// True when the server answered a range request with partial content.
    pub fn is_partial(&self) -> bool { self.status == 206 }
}
