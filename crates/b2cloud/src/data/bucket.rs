use std::fmt;

use serde::{Deserialize, Serialize};

/// Access policy of a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BucketType {
    AllPublic,
    AllPrivate,
    Snapshot,
    /// A type this client does not know about, kept as the service sent it.
    Unknown(String),
}

impl BucketType {
    pub fn as_str(&self) -> &str {
        match self {
            BucketType::AllPublic => "allPublic",
            BucketType::AllPrivate => "allPrivate",
            BucketType::Snapshot => "snapshot",
            BucketType::Unknown(text) => text,
        }
    }
}

impl From<String> for BucketType {
    fn from(text: String) -> Self {
        match text.as_str() {
            "allPublic" => BucketType::AllPublic,
            "allPrivate" => BucketType::AllPrivate,
            "snapshot" => BucketType::Snapshot,
            _ => BucketType::Unknown(text),
        }
    }
}

impl From<BucketType> for String {
    fn from(ty: BucketType) -> Self {
        match ty {
            BucketType::Unknown(text) => text,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BucketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket metadata as returned by the bucket endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub account_id: String,
    pub bucket_id: String,
    pub bucket_name: String,
    pub bucket_type: BucketType,
}

#[derive(Deserialize)]
pub(crate) struct BucketList {
    pub buckets: Vec<Bucket>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateBucketRequest<'a> {
    pub account_id: &'a str,
    pub bucket_name: &'a str,
    pub bucket_type: BucketType,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteBucketRequest<'a> {
    pub account_id: &'a str,
    pub bucket_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListBucketsRequest<'a> {
    pub account_id: &'a str,
}
