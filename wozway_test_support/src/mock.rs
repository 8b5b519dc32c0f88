//! Scripted [`Transport`] that records every request it is handed.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use url::Url;
use wozway_core::transport::{
    BoxFuture, HttpRequest, Transport, TransportBody, TransportError, TransportResponse,
};

/// Replies are streamed back in pieces of this size.
const CHUNK: usize = 64;

/// Snapshot of one request as it reached the transport.
#[derive(Clone, Debug)]
pub struct SentRequest {
    pub operation_id: &'static str,
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub timeout: Option<Duration>,
}

impl From<&HttpRequest> for SentRequest {
    fn from(req: &HttpRequest) -> Self {
        Self {
            operation_id: req.operation_id,
            method: req.method.clone(),
            url: req.url.clone(),
            headers: req.headers.clone(),
            body: req.body.clone(),
            timeout: req.timeout,
        }
    }
}

impl SentRequest {
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decoded query pairs in wire order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
    }

    pub fn body_lossy(&self) -> Option<String> {
        self.body.as_ref().map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

/// What the transport does for one `send()`.
#[derive(Clone, Debug)]
pub enum MockReply {
    Respond {
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    },
    /// `send()` fails with a transport error carrying this message.
    Fail(String),
}

impl MockReply {
    pub fn new(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        if !content_type.is_empty() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        MockReply::Respond {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self::new(status, "", Bytes::new())
    }

    pub fn json(status: StatusCode, body: Bytes) -> Self {
        Self::new(status, "application/json", body)
    }

    pub fn ok_json(body: Bytes) -> Self {
        Self::json(StatusCode::OK, body)
    }

    pub fn ok_text(body: Bytes) -> Self {
        Self::new(StatusCode::OK, "text/plain", body)
    }

    pub fn transport_error(msg: impl Into<String>) -> Self {
        MockReply::Fail(msg.into())
    }

    /// Adds a response header; no effect on [`MockReply::Fail`].
    pub fn header(mut self, name: &'static str, value: &'static str) -> Self {
        if let MockReply::Respond { headers, .. } = &mut self {
            headers.insert(name, HeaderValue::from_static(value));
        }
        self
    }

    fn into_response(self) -> Result<TransportResponse, TransportError> {
        match self {
            MockReply::Fail(msg) => Err(TransportError::msg(msg)),
            MockReply::Respond {
                status,
                headers,
                body,
            } => Ok(TransportResponse {
                status,
                headers,
                content_length: Some(body.len() as u64),
                body: Box::new(ChunkedBody::new(body)),
            }),
        }
    }
}

struct ChunkedBody {
    rest: Bytes,
}

impl ChunkedBody {
    fn new(body: Bytes) -> Self {
        Self { rest: body }
    }
}

impl TransportBody for ChunkedBody {
    fn next_chunk(&mut self) -> BoxFuture<'_, Result<Option<Bytes>, TransportError>> {
        let next = if self.rest.is_empty() {
            None
        } else {
            let at = self.rest.len().min(CHUNK);
            Some(self.rest.split_to(at))
        };
        Box::pin(async move { Ok(next) })
    }
}

#[derive(Debug, Default)]
struct Script {
    sent: Vec<SentRequest>,
    pending: VecDeque<MockReply>,
}

type Shared = Arc<Mutex<Script>>;

fn lock(script: &Shared) -> MutexGuard<'_, Script> {
    script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Transport half of a mock; hand it to the client builder.
#[derive(Clone)]
pub struct MockTransport {
    script: Shared,
}

impl Transport for MockTransport {
    fn send<'a>(
        &'a self,
        req: &'a HttpRequest,
    ) -> BoxFuture<'a, Result<TransportResponse, TransportError>> {
        let reply = {
            let mut script = lock(&self.script);
            script.sent.push(SentRequest::from(req));
            script.pending.pop_front()
        };
        let Some(reply) = reply else {
            panic!(
                "mock transport has no reply left for {} {} ({})",
                req.method, req.url, req.operation_id
            );
        };
        Box::pin(async move { reply.into_response() })
    }
}

/// Inspection half of a mock. Dropping it with replies left over panics,
/// unless the test is already unwinding.
pub struct MockHandle {
    script: Shared,
    checked: bool,
}

impl MockHandle {
    pub fn sent(&self) -> Vec<SentRequest> {
        lock(&self.script).sent.clone()
    }

    /// Most recent request; panics when none was sent.
    pub fn last(&self) -> SentRequest {
        match lock(&self.script).sent.last() {
            Some(req) => req.clone(),
            None => panic!("mock transport was never called"),
        }
    }

    pub fn assert_sent(&self, expected: usize) {
        let sent = self.sent();
        assert_eq!(
            sent.len(),
            expected,
            "request count mismatch, sent: {sent:#?}"
        );
    }

    /// Asserts every scripted reply was consumed.
    pub fn finish(mut self) {
        self.checked = true;
        let left = lock(&self.script).pending.len();
        assert_eq!(left, 0, "{left} scripted replies never used");
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        if self.checked || std::thread::panicking() {
            return;
        }
        let left = lock(&self.script).pending.len();
        if left > 0 {
            panic!("{left} scripted replies never used");
        }
    }
}

/// Queues replies before the transport is built.
#[derive(Default)]
pub struct MockBuilder {
    replies: VecDeque<MockReply>,
}

impl MockBuilder {
    pub fn reply(mut self, reply: MockReply) -> Self {
        self.replies.push_back(reply);
        self
    }

    pub fn replies(mut self, replies: impl IntoIterator<Item = MockReply>) -> Self {
        self.replies.extend(replies);
        self
    }

    pub fn build(self) -> (MockTransport, MockHandle) {
        let script = Arc::new(Mutex::new(Script {
            sent: Vec::new(),
            pending: self.replies,
        }));
        (
            MockTransport {
                script: script.clone(),
            },
            MockHandle {
                script,
                checked: false,
            },
        )
    }
}

pub fn mock() -> MockBuilder {
    MockBuilder::default()
}
