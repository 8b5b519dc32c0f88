use crate::error::FxError;
use bytes::{Bytes, BytesMut};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method, StatusCode};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use url::Url;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Largest up-front buffer reserved from a `Content-Length` hint.
const MAX_PREALLOC: usize = 1 << 20;

/// Fully built request, as seen by `before_request` hooks and the transport.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub operation_id: &'static str,
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub timeout: Option<Duration>,
}

/// Response with its body fully read.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpResponse {
    /// Header value as text; `None` when absent or not visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `Content-Type` header, or `""` when absent.
    pub fn content_type(&self) -> &str {
        self.header(CONTENT_TYPE.as_str()).unwrap_or("")
    }
}

/// Successful call: status, headers and the decoded body.
#[derive(Clone, Debug)]
pub struct DecodedResponse<T> {
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub value: T,
}

impl<T> DecodedResponse<T> {
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("timed out: {0}")]
    Timeout(#[source] FxError),
    #[error("{0}")]
    Other(#[source] FxError),
}

impl TransportError {
    #[inline]
    pub fn new(e: impl Into<FxError>) -> Self {
        TransportError::Other(e.into())
    }

    #[inline]
    pub fn msg(m: impl Into<String>) -> Self {
        TransportError::Other(m.into().into())
    }

    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(Box::new(e))
        } else {
            TransportError::Other(Box::new(e))
        }
    }
}

/// Response body yielded chunk by chunk; `None` marks the end.
pub trait TransportBody: Send + 'static {
    fn next_chunk(&mut self) -> BoxFuture<'_, Result<Option<Bytes>, TransportError>>;
}

pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub content_length: Option<u64>,
    pub body: Box<dyn TransportBody>,
}

/// The HTTP layer the client sends through.
///
/// Implementations send `method`, `url`, `headers` and `body` as given and
/// apply `timeout` when set. Pooling, retries and TLS stay behind this seam.
pub trait Transport: Send + Sync + 'static {
    fn send<'a>(
        &'a self,
        req: &'a HttpRequest,
    ) -> BoxFuture<'a, Result<TransportResponse, TransportError>>;
}

/// [`Transport`] over a shared `reqwest::Client`.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    #[inline]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    #[inline]
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    fn prepare(&self, req: &HttpRequest) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(req.method.clone(), req.url.clone())
            .headers(req.headers.clone());
        let builder = match &req.body {
            Some(body) => builder.body(body.clone()),
            None => builder,
        };
        match req.timeout {
            Some(t) => builder.timeout(t),
            None => builder,
        }
    }
}

impl From<reqwest::Client> for ReqwestTransport {
    fn from(client: reqwest::Client) -> Self {
        Self::new(client)
    }
}

impl TransportBody for reqwest::Response {
    fn next_chunk(&mut self) -> BoxFuture<'_, Result<Option<Bytes>, TransportError>> {
        Box::pin(async move { Ok(self.chunk().await?) })
    }
}

impl Transport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        req: &'a HttpRequest,
    ) -> BoxFuture<'a, Result<TransportResponse, TransportError>> {
        Box::pin(async move {
            let resp = self.prepare(req).send().await?;
            Ok(TransportResponse {
                status: resp.status(),
                headers: resp.headers().clone(),
                content_length: resp.content_length(),
                body: Box::new(resp),
            })
        })
    }
}

/// Drains `body`, reserving up to [`MAX_PREALLOC`] bytes from `size_hint`.
pub(crate) async fn read_to_end(
    body: &mut dyn TransportBody,
    size_hint: Option<u64>,
) -> Result<Bytes, TransportError> {
    let cap = size_hint.map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX).min(MAX_PREALLOC));
    let mut buf = BytesMut::with_capacity(cap);
    while let Some(chunk) = body.next_chunk().await? {
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}
