use crate::metadata::Style;
use crate::transport::HttpResponse;
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD as B64;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use thiserror::Error;

pub type FxError = Box<dyn Error + Send + Sync>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SdkError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("transport: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("invalid/missing param: {0}")]
    InvalidParam(Cow<'static, str>),

    #[error("invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: &'static str },

    #[error("style {style} is not supported for {channel} params (field={field})")]
    InvalidStyle {
        channel: &'static str,
        field: &'static str,
        style: Style,
    },

    #[error("invalid request body type {found} for media type {media_type}")]
    InvalidBodyType {
        found: &'static str,
        media_type: &'static str,
    },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("build url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("security: {0}")]
    Security(Cow<'static, str>),

    #[error("config: {0}")]
    Config(Cow<'static, str>),

    #[error("hook: {0}")]
    Hook(FxError),

    #[error("decode error: {source}")]
    Decode { source: FxError, body: String },

    #[error("in operation {operation}: {source}")]
    InOperation {
        operation: &'static str,
        source: Box<SdkError>,
    },
}

impl SdkError {
    pub fn hook_error(error: impl Into<FxError>) -> SdkError {
        SdkError::Hook(error.into())
    }

    #[inline]
    pub fn in_operation(operation: &'static str, e: SdkError) -> SdkError {
        match e {
            SdkError::InOperation { .. } => e,
            _ => SdkError::InOperation {
                operation,
                source: Box::new(e),
            },
        }
    }

    /// Error with any `InOperation` wrapper removed.
    pub fn root(&self) -> &SdkError {
        match self {
            SdkError::InOperation { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self.root() {
            SdkError::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Uniform error for responses the operation does not define as success.
#[derive(Clone, Debug)]
pub struct ApiError {
    pub message: String,
    /// `-1` when no response was received.
    pub status_code: i32,
    pub body: String,
    pub headers: HeaderMap,
    pub raw_body: Bytes,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: -1,
            body: String::new(),
            headers: HeaderMap::new(),
            raw_body: Bytes::new(),
        }
    }

    pub fn from_response(message: impl Into<String>, resp: &HttpResponse) -> Self {
        Self {
            message: message.into(),
            status_code: i32::from(resp.status.as_u16()),
            body: String::from_utf8_lossy(&resp.body).into_owned(),
            headers: resp.headers.clone(),
            raw_body: resp.body.clone(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        u16::try_from(self.status_code)
            .ok()
            .and_then(|c| StatusCode::from_u16(c).ok())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: Status {}", self.message, self.status_code)?;
        if !self.body.is_empty() {
            write!(f, "\n{}", self.body)?;
        }
        Ok(())
    }
}

impl Error for ApiError {}

/// Bounded preview of a body for decode errors; binary content as base64.
pub fn body_as_text(headers: &HeaderMap, body: &Bytes, full_len: Option<usize>) -> String {
    const MAX: usize = 8 * 1024;
    let ct = headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let slice = if body.len() > MAX {
        &body[..MAX]
    } else {
        &body[..]
    };
    let total_len = full_len.unwrap_or(body.len());
    let textual = ct.is_empty()
        || ct.starts_with("text/")
        || ct.starts_with("application/json")
        || ct.contains("+json")
        || ct.starts_with("application/problem");
    if textual {
        match std::str::from_utf8(slice) {
            Ok(s) => {
                if total_len > slice.len() {
                    format!("{}...", s)
                } else {
                    s.to_owned()
                }
            }
            Err(_) => format!("<non-utf8-text; {} bytes>", slice.len()),
        }
    } else {
        let b64 = B64.encode(slice);
        format!(
            "<non-text; {} bytes; base64:{}{}>",
            total_len,
            &b64[..b64.len().min(1024)],
            if b64.len() > 1024 { "..." } else { "" }
        )
    }
}
