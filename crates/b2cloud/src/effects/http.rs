use std::future::Future;
use std::io;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

/// A boxed stream type for HTTP bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Request body of a streamed upload.
pub type UploadBody = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + Sync + 'static>>;

/// Header pairs in the order they should be sent or were received.
pub type HeaderList = Vec<(String, String)>;

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderList,
    pub body: Bytes,
}

/// A response whose body is still streaming.
pub struct StreamingResponse<E> {
    pub status: u16,
    pub headers: HeaderList,
    pub body: BoxStream<'static, Result<Bytes, E>>,
}

/// Asynchronous HTTP client abstraction.
///
/// The minimal interface the orchestration layer needs. Implementations own
/// their connection pool, timeouts and TLS configuration. A non-2xx status is
/// a successful call here; callers interpret the status.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - In-memory fakes for testing
pub trait HttpClient: Send + Sync {
    /// Error type for transport failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// POST an optional JSON body and buffer the response.
    fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Option<serde_json::Value>,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;

    /// POST a streamed body and buffer the response.
    ///
    /// `headers` carries the `Content-Length` the body will produce.
    fn post_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: UploadBody,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;

    /// GET `url` and hand back the body as a stream once headers arrive.
    fn get_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<StreamingResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use futures_util::StreamExt;
    use reqwest::header::HeaderMap;

    use crate::data::ClientConfig;

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Create a client with reqwest's default configuration.
        pub fn new() -> Result<Self, reqwest::Error> {
            let client = reqwest::Client::builder().build()?;
            Ok(Self { client })
        }

        /// Create a client honoring the timeouts and user agent of `config`.
        pub fn from_config(config: &ClientConfig) -> Result<Self, reqwest::Error> {
            let mut builder = reqwest::Client::builder()
                .user_agent(config.user_agent.as_str())
                .connect_timeout(config.connect_timeout_duration());
            if let Some(timeout) = config.request_timeout_duration() {
                builder = builder.timeout(timeout);
            }
            Ok(Self {
                client: builder.build()?,
            })
        }

        /// Wrap an already configured reqwest client.
        pub fn with_client(client: reqwest::Client) -> Self { Self { client } }

        fn apply(
            mut request: reqwest::RequestBuilder,
            headers: &[(String, String)],
        ) -> reqwest::RequestBuilder {
            for (key, value) in headers {
                request = request.header(key.as_str(), value.as_str());
            }
            request
        }
    }

    fn header_list(headers: &HeaderMap) -> HeaderList {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect()
    }

    async fn buffer(response: reqwest::Response) -> Result<HttpResponse, reqwest::Error> {
        let status = response.status().as_u16();
        let headers = header_list(response.headers());
        let body = response.bytes().await?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn post_json(
            &self,
            url: &str,
            headers: &[(String, String)],
            body: Option<serde_json::Value>,
        ) -> Result<HttpResponse, Self::Error> {
            let mut request = Self::apply(self.client.post(url), headers);
            if let Some(body) = body {
                request = request.json(&body);
            }
            buffer(request.send().await?).await
        }

        async fn post_stream(
            &self,
            url: &str,
            headers: &[(String, String)],
            body: UploadBody,
        ) -> Result<HttpResponse, Self::Error> {
            let request = Self::apply(self.client.post(url), headers)
                .body(reqwest::Body::wrap_stream(body));
            buffer(request.send().await?).await
        }

        async fn get_stream(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> Result<StreamingResponse<Self::Error>, Self::Error> {
            let response = Self::apply(self.client.get(url), headers).send().await?;
            let status = response.status().as_u16();
            let headers = header_list(response.headers());
            let body = response.bytes_stream().boxed();
            Ok(StreamingResponse {
                status,
                headers,
                body,
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
