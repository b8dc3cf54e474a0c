use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Target of a single upload, requested fresh for every upload.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    pub upload_url: String,
    pub authorization_token: String,
    pub bucket_id: String,
}

impl fmt::Debug for UploadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadTicket")
            .field("upload_url", &self.upload_url)
            .field("authorization_token", &"<redacted>")
            .field("bucket_id", &self.bucket_id)
            .finish()
    }
}

/// File metadata returned by upload, file-info and listing calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub file_id: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
    #[serde(default, alias = "size", skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub file_info: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_timestamp: Option<u64>,
}

/// Result of `b2_delete_file_version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedFileVersion {
    pub file_id: String,
    pub file_name: String,
}

/// One page of `b2_list_file_names`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNameListing {
    pub files: Vec<FileInfo>,
    #[serde(default)]
    pub next_file_name: Option<String>,
}

/// Paging and filtering for [`crate::Client::list_bucket_files`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilesOptions {
    pub start_file_name: Option<String>,
    pub max_file_count: Option<u32>,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
}

impl ListFilesOptions {
    #[must_use]
    pub fn start_file_name(mut self, name: impl Into<String>) -> Self {
        self.start_file_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn max_file_count(mut self, count: u32) -> Self {
        self.max_file_count = Some(count);
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListFileNamesRequest<'a> {
    pub bucket_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_file_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<&'a str>,
}

impl<'a> ListFileNamesRequest<'a> {
    pub(crate) fn new(bucket_id: &'a str, options: &'a ListFilesOptions) -> Self {
        Self {
            bucket_id,
            start_file_name: options.start_file_name.as_deref(),
            max_file_count: options.max_file_count,
            prefix: options.prefix.as_deref(),
            delimiter: options.delimiter.as_deref(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GetUploadUrlRequest<'a> {
    pub bucket_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GetFileInfoRequest<'a> {
    pub file_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteFileVersionRequest<'a> {
    pub file_name: &'a str,
    pub file_id: &'a str,
}
