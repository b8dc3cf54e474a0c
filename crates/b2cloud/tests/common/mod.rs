//! In-memory stand-in for the storage service.
//!
//! Routes requests by host: `auth.test` for login, `api.test` for JSON
//! operations, `upload.test` for uploads and `download.test` for downloads.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use b2cloud::core::basic_auth;
use b2cloud::verify::Sha1Hasher;
use b2cloud::{
    BucketType, Client, ClientConfig, HttpClient, HttpResponse, StreamingResponse, UploadBody,
};
use bytes::Bytes;
use futures_util::StreamExt;
use serde_json::{Value, json};

pub const ACCOUNT_ID: &str = "acct-1";
pub const APPLICATION_KEY: &str = "app-key";
pub const AUTH_URL: &str = "https://auth.test/b2api/v1/b2_authorize_account";
pub const API_URL: &str = "https://api.test";
pub const DOWNLOAD_URL: &str = "https://download.test";
const UPLOAD_TOKEN: &str = "upload-token";

pub fn config() -> ClientConfig { ClientConfig::new(ACCOUNT_ID, APPLICATION_KEY).auth_url(AUTH_URL) }

pub fn client(fake: FakeB2) -> Client<FakeB2> {
    Client::with_http(config(), fake).expect("valid config")
}

#[derive(Clone)]
struct StoredBucket {
    id: String,
    name: String,
    bucket_type: BucketType,
}

#[derive(Clone)]
struct StoredFile {
    id: String,
    name: String,
    bucket_id: String,
    content: Bytes,
    sha1: String,
    content_type: String,
}

#[derive(Default)]
struct State {
    buckets: Vec<StoredBucket>,
    files: BTreeMap<String, StoredFile>,
    next_id: u64,
    token: Option<String>,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

/// Scripted fake service with call counters and failure injection.
#[derive(Default)]
pub struct FakeB2 {
    state: Mutex<State>,
    logins: AtomicUsize,
    bucket_listings: AtomicUsize,
    upload_url_requests: AtomicUsize,
    uploads: AtomicUsize,
    downloads: AtomicUsize,
    failing_logins: AtomicUsize,
    login_delay: Mutex<Option<Duration>>,
    upload_status: Mutex<Option<u16>>,
    download_cut_after: Mutex<Option<usize>>,
    corrupt_sha1: Mutex<bool>,
}

impl FakeB2 {
    pub fn new() -> Self { Self::default() }

    pub fn with_bucket(self, name: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.next_id("bucket");
            state.buckets.push(StoredBucket {
                id,
                name: name.to_string(),
                bucket_type: BucketType::AllPrivate,
            });
        }
        self
    }

    pub fn with_login_delay(self, delay: Duration) -> Self {
        *self.login_delay.lock().unwrap() = Some(delay);
        self
    }

    /// Reject the next `count` logins with 401.
    pub fn fail_next_logins(&self, count: usize) { self.failing_logins.store(count, Ordering::SeqCst) }

    /// Answer every upload with `status` instead of storing the file.
    pub fn reject_uploads(&self, status: u16) { *self.upload_status.lock().unwrap() = Some(status) }

    /// Break download bodies after `bytes` bytes.
    pub fn cut_downloads_after(&self, bytes: usize) {
        *self.download_cut_after.lock().unwrap() = Some(bytes)
    }

    /// Advertise a wrong SHA-1 on full downloads.
    pub fn corrupt_download_sha1(&self) { *self.corrupt_sha1.lock().unwrap() = true }

    /// Store an object directly, bypassing the upload path.
    pub fn put_file(&self, bucket_name: &str, name: &str, content: &[u8]) -> String {
        let mut state = self.state.lock().unwrap();
        let bucket_id = state
            .buckets
            .iter()
            .find(|b| b.name == bucket_name)
            .map(|b| b.id.clone())
            .expect("bucket exists");
        let id = state.next_id("file");
        state.files.insert(
            id.clone(),
            StoredFile {
                id: id.clone(),
                name: name.to_string(),
                bucket_id,
                content: Bytes::copy_from_slice(content),
                sha1: Sha1Hasher::digest_hex(content),
                content_type: content_type_of(name).to_string(),
            },
        );
        id
    }

    pub fn logins(&self) -> usize { self.logins.load(Ordering::SeqCst) }

    pub fn bucket_listings(&self) -> usize { self.bucket_listings.load(Ordering::SeqCst) }

    pub fn upload_url_requests(&self) -> usize { self.upload_url_requests.load(Ordering::SeqCst) }

    pub fn uploads(&self) -> usize { self.uploads.load(Ordering::SeqCst) }

    pub fn downloads(&self) -> usize { self.downloads.load(Ordering::SeqCst) }

    async fn login(&self, headers: &[(String, String)]) -> HttpResponse {
        self.logins.fetch_add(1, Ordering::SeqCst);
        let delay = *self.login_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failing = self
            .failing_logins
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        let expected = basic_auth(ACCOUNT_ID, APPLICATION_KEY);
        if failing || header(headers, "authorization") != Some(expected.as_str()) {
            return error(401, "unauthorized", "invalid application key");
        }

        let mut state = self.state.lock().unwrap();
        let token = state.next_id("token");
        state.token = Some(token.clone());
        respond(
            200,
            json!({
                "accountId": ACCOUNT_ID,
                "apiUrl": API_URL,
                "authorizationToken": token,
                "downloadUrl": DOWNLOAD_URL,
                "recommendedPartSize": 100_000_000,
                "absoluteMinimumPartSize": 5_000_000
            }),
        )
    }

    fn api(&self, operation: &str, headers: &[(String, String)], body: Value) -> HttpResponse {
        let mut state = self.state.lock().unwrap();
        if state.token.is_none() || header(headers, "authorization") != state.token.as_deref() {
            return error(401, "bad_auth_token", "invalid authorization token");
        }
        if body.get("accountId").is_some_and(|id| id != ACCOUNT_ID) {
            return error(401, "unauthorized", "wrong account");
        }
        let field = |name: &str| body.get(name).and_then(Value::as_str).unwrap_or_default().to_string();

        match operation {
            "b2_list_buckets" => {
                self.bucket_listings.fetch_add(1, Ordering::SeqCst);
                let buckets: Vec<Value> = state.buckets.iter().map(bucket_json).collect();
                respond(200, json!({ "buckets": buckets }))
            }
            "b2_create_bucket" => {
                let name = field("bucketName");
                if state.buckets.iter().any(|b| b.name == name) {
                    return error(400, "duplicate_bucket_name", "bucket name already in use");
                }
                let bucket_type = serde_json::from_value(body["bucketType"].clone())
                    .unwrap_or(BucketType::AllPrivate);
                let id = state.next_id("bucket");
                let bucket = StoredBucket { id, name, bucket_type };
                state.buckets.push(bucket.clone());
                respond(200, bucket_json(&bucket))
            }
            "b2_delete_bucket" => {
                let id = field("bucketId");
                match state.buckets.iter().position(|b| b.id == id) {
                    Some(index) => {
                        let bucket = state.buckets.remove(index);
                        respond(200, bucket_json(&bucket))
                    }
                    None => error(400, "bad_request", &format!("invalid bucketId: {id}")),
                }
            }
            "b2_get_upload_url" => {
                self.upload_url_requests.fetch_add(1, Ordering::SeqCst);
                let id = field("bucketId");
                if !state.buckets.iter().any(|b| b.id == id) {
                    return error(400, "bad_request", "invalid bucketId");
                }
                respond(
                    200,
                    json!({
                        "bucketId": id,
                        "uploadUrl": format!("https://upload.test/{id}"),
                        "authorizationToken": UPLOAD_TOKEN
                    }),
                )
            }
            "b2_get_file_info" => match state.files.get(&field("fileId")) {
                Some(file) => respond(200, file_json(file)),
                None => error(404, "not_found", "file not present"),
            },
            "b2_delete_file_version" => {
                let id = field("fileId");
                match state.files.get(&id) {
                    Some(file) if file.name == field("fileName") => {
                        let file = state.files.remove(&id).expect("present");
                        respond(200, json!({ "fileId": file.id, "fileName": file.name }))
                    }
                    _ => error(400, "bad_request", "file not present"),
                }
            }
            "b2_list_file_names" => {
                let bucket_id = field("bucketId");
                let mut files: Vec<&StoredFile> =
                    state.files.values().filter(|f| f.bucket_id == bucket_id).collect();
                files.sort_by(|a, b| a.name.cmp(&b.name));
                let files: Vec<Value> = files.into_iter().map(file_json).collect();
                respond(200, json!({ "files": files, "nextFileName": null }))
            }
            _ => error(404, "not_found", "unknown operation"),
        }
    }
}

impl HttpClient for FakeB2 {
    type Error = io::Error;

    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Option<Value>,
    ) -> Result<HttpResponse, Self::Error> {
        if url == AUTH_URL {
            return Ok(self.login(headers).await);
        }
        match url.strip_prefix("https://api.test/b2api/v1/") {
            Some(operation) => Ok(self.api(operation, headers, body.unwrap_or(Value::Null))),
            None => Err(io::Error::new(io::ErrorKind::NotFound, format!("no route to {url}"))),
        }
    }

    async fn post_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
        mut body: UploadBody,
    ) -> Result<HttpResponse, Self::Error> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        let bucket_id = url
            .strip_prefix("https://upload.test/")
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, url.to_string()))?
            .to_string();

        let mut content = Vec::new();
        while let Some(chunk) = body.next().await {
            content.extend_from_slice(&chunk?);
        }

        let rejected = *self.upload_status.lock().unwrap();
        if let Some(status) = rejected {
            return Ok(error(status, "service_unavailable", "no tomes available"));
        }
        if header(headers, "authorization") != Some(UPLOAD_TOKEN) {
            return Ok(error(401, "bad_auth_token", "invalid upload token"));
        }
        if header(headers, "content-type") != Some("b2/x-auto") {
            return Ok(error(400, "bad_request", "unexpected content type"));
        }
        if header(headers, "content-length") != Some(content.len().to_string().as_str()) {
            return Ok(error(400, "bad_request", "content length mismatch"));
        }
        let sha1 = Sha1Hasher::digest_hex(&content);
        if header(headers, "x-bz-content-sha1") != Some(sha1.as_str()) {
            return Ok(error(400, "bad_request", "sha1 did not match data received"));
        }
        let name = header(headers, "x-bz-file-name")
            .map(decode_file_name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "missing file name"))?;

        let mut state = self.state.lock().unwrap();
        let id = state.next_id("file");
        let file = StoredFile {
            id: id.clone(),
            content_type: content_type_of(&name).to_string(),
            name,
            bucket_id,
            content: Bytes::from(content),
            sha1,
        };
        let response = file_json(&file);
        state.files.insert(id, file);
        Ok(respond(200, response))
    }

    async fn get_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<StreamingResponse<Self::Error>, Self::Error> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let path = url
            .strip_prefix("https://download.test/file/")
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, url.to_string()))?;
        let (bucket_name, file_name) = path.split_once('/').unwrap_or((path, ""));
        let file_name = decode_file_name(file_name);

        let file = {
            let state = self.state.lock().unwrap();
            let authorized =
                state.token.is_some() && header(headers, "authorization") == state.token.as_deref();
            if !authorized {
                return Ok(streaming(error(401, "bad_auth_token", "invalid token"), None));
            }
            state
                .buckets
                .iter()
                .find(|b| b.name == bucket_name)
                .and_then(|bucket| {
                    state
                        .files
                        .values()
                        .find(|f| f.bucket_id == bucket.id && f.name == file_name)
                })
                .cloned()
        };
        let Some(file) = file else {
            return Ok(streaming(error(404, "not_found", "file not present"), None));
        };

        let mut response_headers = vec![
            ("content-type".to_string(), file.content_type.clone()),
            ("x-bz-file-id".to_string(), file.id.clone()),
            ("x-bz-file-name".to_string(), file.name.clone()),
        ];
        let (status, content) = match header(headers, "range").and_then(parse_range) {
            Some((start, end)) => {
                let end = end.min(file.content.len().saturating_sub(1));
                response_headers.push((
                    "content-range".to_string(),
                    format!("bytes {start}-{end}/{}", file.content.len()),
                ));
                (206, file.content.slice(start..=end))
            }
            None => {
                let sha1 = if *self.corrupt_sha1.lock().unwrap() {
                    "0000000000000000000000000000000000000000".to_string()
                } else {
                    file.sha1.clone()
                };
                response_headers.push(("x-bz-content-sha1".to_string(), sha1));
                (200, file.content.clone())
            }
        };
        response_headers.push(("content-length".to_string(), content.len().to_string()));

        let cut = *self.download_cut_after.lock().unwrap();
        Ok(streaming(
            HttpResponse {
                status,
                headers: response_headers,
                body: content,
            },
            cut,
        ))
    }
}

fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

fn parse_range(value: &str) -> Option<(usize, usize)> {
    let (start, end) = value.strip_prefix("bytes=")?.split_once('-')?;
    Some((start.parse().ok()?, end.parse().ok()?))
}

fn decode_file_name(encoded: &str) -> String {
    url::form_urlencoded::parse(format!("n={encoded}").as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

fn content_type_of(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("gif") => "image/gif",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

fn bucket_json(bucket: &StoredBucket) -> Value {
    json!({
        "accountId": ACCOUNT_ID,
        "bucketId": bucket.id,
        "bucketName": bucket.name,
        "bucketType": bucket.bucket_type,
        "bucketInfo": {},
        "revision": 1
    })
}

fn file_json(file: &StoredFile) -> Value {
    json!({
        "accountId": ACCOUNT_ID,
        "action": "upload",
        "bucketId": file.bucket_id,
        "contentLength": file.content.len(),
        "contentSha1": file.sha1,
        "contentType": file.content_type,
        "fileId": file.id,
        "fileInfo": {},
        "fileName": file.name,
        "uploadTimestamp": 1_500_000_000_000u64
    })
}

fn respond(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Bytes::from(body.to_string()),
    }
}

fn error(status: u16, code: &str, message: &str) -> HttpResponse {
    respond(status, json!({ "status": status, "code": code, "message": message }))
}

/// Turn a buffered response into a body streamed in small chunks, optionally
/// failing after `cut_after` bytes.
fn streaming(response: HttpResponse, cut_after: Option<usize>) -> StreamingResponse<io::Error> {
    let body = response.body;
    let limit = cut_after.unwrap_or(body.len()).min(body.len());
    let mut chunks: Vec<Result<Bytes, io::Error>> = (0..limit)
        .step_by(7)
        .map(|start| Ok(body.slice(start..(start + 7).min(limit))))
        .collect();
    if cut_after.is_some_and(|cut| cut < body.len()) {
        chunks.push(Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")));
    }
    StreamingResponse {
        status: response.status,
        headers: response.headers,
        body: futures_util::stream::iter(chunks).boxed(),
    }
}
