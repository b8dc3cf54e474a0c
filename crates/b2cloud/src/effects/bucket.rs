use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::core;
use crate::data::bucket::{BucketList, CreateBucketRequest, DeleteBucketRequest, ListBucketsRequest};
use crate::data::{Authorization, Bucket, BucketType};
use crate::effects::api;
use crate::effects::cache::RefreshSlot;
use crate::effects::http::HttpClient;
use crate::error::{Error, Result};

/// Snapshot of the account's buckets, keyed by name.
struct BucketTable {
    by_name: HashMap<String, Bucket>,
    listed_at: Instant,
}

impl BucketTable {
    fn from_listing(buckets: Vec<Bucket>) -> Self {
        Self {
            by_name: buckets
                .into_iter()
                .map(|bucket| (bucket.bucket_name.clone(), bucket))
                .collect(),
            listed_at: Instant::now(),
        }
    }

    fn lookup(&self, name: &str, ttl: Option<Duration>) -> Option<&Bucket> {
        if core::is_fresh(self.listed_at, ttl) {
            self.by_name.get(name)
        } else {
            None
        }
    }
}

/// Name to bucket resolution backed by a full listing.
///
/// A miss re-lists every bucket and replaces the table whole. Concurrent
/// misses share one listing.
pub(crate) struct BucketResolver {
    ttl: Option<Duration>,
    slot: RefreshSlot<BucketTable>,
}

impl BucketResolver {
    pub(crate) fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            slot: RefreshSlot::new(),
        }
    }

    pub(crate) async fn resolve<C: HttpClient>(
        &self,
        http: &C,
        auth: &Authorization,
        name: &str,
    ) -> Result<Bucket> {
        let table = self
            .slot
            .get_or_refresh(
                |table| table.lookup(name, self.ttl).is_some(),
                || async {
                    debug!(bucket = name, "bucket cache miss, listing buckets");
                    list_buckets(http, auth).await.map(BucketTable::from_listing)
                },
            )
            .await?;

        table
            .by_name
            .get(name)
            .cloned()
            .ok_or_else(|| Error::BucketNotFound(name.to_string()))
    }

    /// List every bucket and refresh the table with the result.
    pub(crate) async fn refresh<C: HttpClient>(
        &self,
        http: &C,
        auth: &Authorization,
    ) -> Result<Vec<Bucket>> {
        let buckets = list_buckets(http, auth).await?;
        self.slot.replace(BucketTable::from_listing(buckets.clone()));
        Ok(buckets)
    }

    pub(crate) fn invalidate(&self) { self.slot.clear() }
}

async fn list_buckets<C: HttpClient>(http: &C, auth: &Authorization) -> Result<Vec<Bucket>> {
    let request = ListBucketsRequest {
        account_id: &auth.account_id,
    };
    let listing: BucketList = api::call(http, auth, "b2_list_buckets", &request).await?;
    info!(count = listing.buckets.len(), "listed buckets");
    Ok(listing.buckets)
}

pub(crate) async fn create_bucket<C: HttpClient>(
    http: &C,
    auth: &Authorization,
    name: &str,
    bucket_type: BucketType,
) -> Result<Bucket> {
    let request = CreateBucketRequest {
        account_id: &auth.account_id,
        bucket_name: name,
        bucket_type,
    };
    let bucket: Bucket = api::call(http, auth, "b2_create_bucket", &request).await?;
    info!(bucket = %bucket.bucket_name, bucket_id = %bucket.bucket_id, "created bucket");
    Ok(bucket)
}

pub(crate) async fn delete_bucket<C: HttpClient>(
    http: &C,
    auth: &Authorization,
    bucket_id: &str,
) -> Result<Bucket> {
    let request = DeleteBucketRequest {
        account_id: &auth.account_id,
        bucket_id,
    };
    let bucket: Bucket = api::call(http, auth, "b2_delete_bucket", &request).await?;
    info!(bucket = %bucket.bucket_name, bucket_id = %bucket.bucket_id, "deleted bucket");
    Ok(bucket)
}
