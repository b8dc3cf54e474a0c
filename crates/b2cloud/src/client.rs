use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::data::{
    Authorization, Bucket, BucketType, ByteRange, CallOptions, ClientConfig, DeletedFileVersion,
    DownloadHeaders, DownloadOptions, FileInfo, FileNameListing, ListFilesOptions, UploadOptions,
    UploadTicket,
};
use crate::effects::auth::CredentialCache;
use crate::effects::bucket::{self, BucketResolver};
use crate::effects::call::guarded;
use crate::effects::http::HttpClient;
use crate::effects::{download, file, upload};
use crate::error::Result;

struct Inner<C> {
    http: C,
    credentials: CredentialCache,
    buckets: BucketResolver,
}

/// Client for the object-storage API.
///
/// Owns the credential cache and the bucket cache; cloning a client shares
/// both, as well as the underlying transport.
///
/// # Examples
///
/// ```no_run
/// use b2cloud::{ByteRange, Client, ClientConfig};
///
/// # async fn run() -> b2cloud::Result<()> {
/// let client = Client::new(ClientConfig::load(None)?)?;
///
/// let uploaded = client.upload_file("logo.gif", "my-bucket").await?;
/// let headers = client
///     .download_file("logo.gif", "my-bucket", "/tmp/logo-head.gif", Some(ByteRange::new(0, 99)))
///     .await?;
/// assert_eq!(headers.bytes_written, 100);
/// client.delete_file_version(&uploaded.file_name, &uploaded.file_id).await?;
/// # Ok(())
/// # }
/// ```
pub struct Client<C: HttpClient> {
    inner: Arc<Inner<C>>,
    call: CallOptions,
}

impl<C: HttpClient> Clone for Client<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            call: self.call.clone(),
        }
    }
}

#[cfg(feature = "reqwest")]
impl Client<crate::effects::ReqwestClient> {
    /// Create a client backed by reqwest, configured from `config`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http =
            crate::effects::ReqwestClient::from_config(&config).map_err(crate::Error::network)?;
        Self::with_http(config, http)
    }

    /// Create a client from `B2_*` environment variables.
    pub fn from_env() -> Result<Self> { Self::new(ClientConfig::load(None)?) }
}

impl<C: HttpClient> Client<C> {
    /// Create a client using a custom transport.
    pub fn with_http(config: ClientConfig, http: C) -> Result<Self> {
        config.validate()?;
        let credentials = CredentialCache::new(
            config.credentials(),
            config.auth_url.clone(),
            config.token_ttl_duration(),
        );
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                credentials,
                buckets: BucketResolver::new(config.bucket_cache_ttl_duration()),
            }),
            call: CallOptions::default(),
        })
    }

    /// A view of this client whose operations run under `options`.
    ///
    /// The view shares caches and transport with `self`.
    #[must_use]
    pub fn with_call_options(&self, options: CallOptions) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            call: options,
        }
    }

    pub fn call_options(&self) -> &CallOptions { &self.call }

    pub fn http(&self) -> &C { &self.inner.http }

    /// The cached authorization, if any, without contacting the service.
    pub fn cached_authorization(&self) -> Option<Arc<Authorization>> {
        self.inner.credentials.peek()
    }

    /// Drop the cached authorization and bucket table.
    pub fn invalidate_caches(&self) {
        self.inner.credentials.invalidate();
        self.inner.buckets.invalidate();
        debug!("caches invalidated");
    }

    /// Return a valid authorization, logging in only when the cached one is
    /// missing or expired.
    pub async fn authorize(&self) -> Result<Arc<Authorization>> {
        guarded(&self.call, self.credentials()).await
    }

    pub async fn create_bucket(&self, name: &str, bucket_type: BucketType) -> Result<Bucket> {
        guarded(&self.call, async {
            let auth = self.credentials().await?;
            let created = bucket::create_bucket(&self.inner.http, &auth, name, bucket_type).await?;
            self.inner.buckets.invalidate();
            Ok(created)
        })
        .await
    }

    /// Delete an empty bucket and return it as it was before deletion.
    pub async fn delete_bucket(&self, bucket_id: &str) -> Result<Bucket> {
        guarded(&self.call, async {
            let auth = self.credentials().await?;
            let deleted = bucket::delete_bucket(&self.inner.http, &auth, bucket_id).await?;
            self.inner.buckets.invalidate();
            Ok(deleted)
        })
        .await
    }

    /// List every bucket of the account and refresh the bucket cache.
    pub async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        guarded(&self.call, async {
            let auth = self.credentials().await?;
            self.inner.buckets.refresh(&self.inner.http, &auth).await
        })
        .await
    }

    /// Resolve a bucket name, re-listing the account's buckets on a miss.
    ///
    /// Fails with [`crate::Error::BucketNotFound`] if the name is absent
    /// from a fresh listing.
    pub async fn bucket_by_name(&self, name: &str) -> Result<Bucket> {
        guarded(&self.call, self.resolve_bucket(name)).await
    }

    pub async fn list_bucket_files(
        &self,
        bucket_name: &str,
        options: ListFilesOptions,
    ) -> Result<FileNameListing> {
        guarded(&self.call, async {
            let bucket = self.resolve_bucket(bucket_name).await?;
            let auth = self.credentials().await?;
            file::list_file_names(&self.inner.http, &auth, &bucket.bucket_id, &options).await
        })
        .await
    }

    /// Request a fresh upload target for `bucket_name`.
    pub async fn get_upload_url(&self, bucket_name: &str) -> Result<UploadTicket> {
        guarded(&self.call, self.upload_ticket(bucket_name)).await
    }

    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        bucket_name: &str,
    ) -> Result<FileInfo> {
        self.upload_file_with(path, bucket_name, UploadOptions::default())
            .await
    }

    /// Upload a local file into `bucket_name` under its base name.
    ///
    /// The upload target, file size and SHA-1 are resolved concurrently
    /// before the body is streamed.
    pub async fn upload_file_with(
        &self,
        path: impl AsRef<Path>,
        bucket_name: &str,
        options: UploadOptions,
    ) -> Result<FileInfo> {
        let path = path.as_ref();
        guarded(
            &self.call,
            upload::upload_file(
                &self.inner.http,
                self.upload_ticket(bucket_name),
                path,
                &options,
            ),
        )
        .await
    }

    /// Download `file_name` from `bucket_name` into `save_path`, optionally
    /// only the inclusive byte `range`.
    pub async fn download_file(
        &self,
        file_name: &str,
        bucket_name: &str,
        save_path: impl AsRef<Path>,
        range: Option<ByteRange>,
    ) -> Result<DownloadHeaders> {
        let options = match range {
            Some(range) => DownloadOptions::default().range(range),
            None => DownloadOptions::default(),
        };
        self.download_file_with(file_name, bucket_name, save_path, options)
            .await
    }

    pub async fn download_file_with(
        &self,
        file_name: &str,
        bucket_name: &str,
        save_path: impl AsRef<Path>,
        options: DownloadOptions,
    ) -> Result<DownloadHeaders> {
        let save_path = save_path.as_ref();
        guarded(&self.call, async {
            let auth = self.credentials().await?;
            download::download_file(
                &self.inner.http,
                &auth,
                bucket_name,
                file_name,
                save_path,
                &options,
            )
            .await
        })
        .await
    }

    pub async fn get_file_info(&self, file_id: &str) -> Result<FileInfo> {
        guarded(&self.call, async {
            let auth = self.credentials().await?;
            file::get_file_info(&self.inner.http, &auth, file_id).await
        })
        .await
    }

    pub async fn delete_file_version(
        &self,
        file_name: &str,
        file_id: &str,
    ) -> Result<DeletedFileVersion> {
        guarded(&self.call, async {
            let auth = self.credentials().await?;
            file::delete_file_version(&self.inner.http, &auth, file_name, file_id).await
        })
        .await
    }

    async fn credentials(&self) -> Result<Arc<Authorization>> {
        self.inner.credentials.get(&self.inner.http).await
    }

    async fn resolve_bucket(&self, name: &str) -> Result<Bucket> {
        let auth = self.credentials().await?;
        self.inner.buckets.resolve(&self.inner.http, &auth, name).await
    }

    async fn upload_ticket(&self, bucket_name: &str) -> Result<UploadTicket> {
        let (auth, bucket) =
            tokio::try_join!(self.credentials(), self.resolve_bucket(bucket_name))?;
        file::get_upload_url(&self.inner.http, &auth, &bucket.bucket_id).await
    }
}
