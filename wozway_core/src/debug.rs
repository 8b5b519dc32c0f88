//! Opt-in tracing of operation calls, gated by [`DebugLevel`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, StatusCode};
use std::error::Error;
use std::fmt;

/// Body previews stop after this many characters.
pub const PREVIEW_MAX_CHARS: usize = 32 * 1024;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub enum DebugLevel {
    #[default]
    None,
    /// Request line, response status and failures.
    V,
    /// `V` plus headers and body previews.
    VV,
}

impl DebugLevel {
    #[inline]
    pub fn is_enabled(self) -> bool {
        self != DebugLevel::None
    }

    #[inline]
    pub fn is_verbose(self) -> bool {
        self >= DebugLevel::V
    }

    #[inline]
    pub fn is_very_verbose(self) -> bool {
        self == DebugLevel::VV
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DebugLevel::None => "none",
            DebugLevel::V => "v",
            DebugLevel::VV => "vv",
        })
    }
}

/// How a body is rendered in previews.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BodyKind {
    Text,
    /// Previewed as base64.
    Binary,
}

impl BodyKind {
    pub fn of(content_type: &str) -> BodyKind {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        let textual = essence.starts_with("text/")
            || essence.ends_with("json")
            || essence.ends_with("xml")
            || essence == "application/x-www-form-urlencoded";
        if textual { BodyKind::Text } else { BodyKind::Binary }
    }
}

/// Body preview capped at `max_chars`, with `…` marking a cut.
pub fn preview(kind: BodyKind, body: &[u8], max_chars: usize) -> String {
    match kind {
        BodyKind::Text => {
            let text = String::from_utf8_lossy(body);
            let mut chars = text.chars();
            let mut out: String = chars.by_ref().take(max_chars).collect();
            if chars.next().is_some() {
                out.push('…');
            }
            out
        }
        BodyKind::Binary => {
            let take = body.len().min(max_chars / 4 * 3);
            let mut out = STANDARD_NO_PAD.encode(&body[..take]);
            if take < body.len() {
                out.push('…');
            }
            out
        }
    }
}

/// One traced step of an operation call.
#[derive(Debug)]
pub enum DebugEvent<'a> {
    Request {
        operation_id: &'static str,
        method: &'a Method,
        url: &'a str,
    },
    RequestHeaders(&'a HeaderMap),
    RequestBody {
        body: &'a Bytes,
        kind: BodyKind,
    },
    Response {
        status: StatusCode,
        url: &'a str,
        is_error: bool,
    },
    ResponseHeaders(&'a HeaderMap),
    ResponseBody {
        body: &'a Bytes,
        kind: BodyKind,
    },
    Failed {
        operation_id: &'static str,
        error: &'a (dyn Error + 'a),
    },
}

impl DebugEvent<'_> {
    /// Lowest level at which the event is recorded.
    pub fn level(&self) -> DebugLevel {
        match self {
            DebugEvent::Request { .. } | DebugEvent::Response { .. } | DebugEvent::Failed { .. } => {
                DebugLevel::V
            }
            _ => DebugLevel::VV,
        }
    }
}

/// Renders one line (or a header block) with secrets redacted.
impl fmt::Display for DebugEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugEvent::Request {
                operation_id,
                method,
                url,
            } => write!(f, "-> {method} {url} ({operation_id})"),
            DebugEvent::RequestHeaders(headers) => write_headers(f, "request", headers),
            DebugEvent::RequestBody { body, kind } => write!(
                f,
                "request body ({} bytes): {}",
                body.len(),
                preview(*kind, body, PREVIEW_MAX_CHARS)
            ),
            DebugEvent::Response {
                status,
                url,
                is_error,
            } => {
                let tag = if *is_error { "error" } else { "ok" };
                write!(f, "<- {} {url} ({tag})", status.as_u16())
            }
            DebugEvent::ResponseHeaders(headers) => write_headers(f, "response", headers),
            DebugEvent::ResponseBody { body, kind } => write!(
                f,
                "response body ({} bytes): {}",
                body.len(),
                preview(*kind, body, PREVIEW_MAX_CHARS)
            ),
            DebugEvent::Failed {
                operation_id,
                error,
            } => write!(f, "!! {operation_id} failed: {error}"),
        }
    }
}

fn write_headers(f: &mut fmt::Formatter<'_>, side: &str, headers: &HeaderMap) -> fmt::Result {
    write!(f, "{side} headers:")?;
    for (name, value) in headers {
        write!(f, "\n  {name}: {}", redacted(name, value))?;
    }
    Ok(())
}

pub trait DebugSink: Send + Sync + 'static {
    fn record(&self, level: DebugLevel, event: &DebugEvent<'_>);
}

#[derive(Debug, Default)]
pub struct NoopDebugSink;

impl DebugSink for NoopDebugSink {
    #[inline]
    fn record(&self, _: DebugLevel, _: &DebugEvent<'_>) {}
}

#[derive(Debug, Default)]
pub struct StderrDebugSink;

impl DebugSink for StderrDebugSink {
    fn record(&self, level: DebugLevel, event: &DebugEvent<'_>) {
        eprintln!("[wozway:{level}] {event}");
    }
}

/// Emits `tracing` events under the `wozway` target: request lines at
/// `debug`, failures at `warn`, headers and bodies at `trace`.
#[derive(Debug, Default)]
pub struct TracingDebugSink;

impl DebugSink for TracingDebugSink {
    fn record(&self, level: DebugLevel, event: &DebugEvent<'_>) {
        match event {
            DebugEvent::Request {
                operation_id,
                method,
                url,
            } => {
                tracing::debug!(target: "wozway", verbosity = %level, %method, url, operation_id, "request")
            }
            DebugEvent::Response {
                status,
                url,
                is_error: false,
            } => tracing::debug!(target: "wozway", status = status.as_u16(), url, "response"),
            DebugEvent::Response { status, url, .. } => {
                tracing::warn!(target: "wozway", status = status.as_u16(), url, "error response")
            }
            DebugEvent::Failed {
                operation_id,
                error,
            } => tracing::warn!(target: "wozway", operation_id, error = %error, "request failed"),
            other => tracing::trace!(target: "wozway", "{other}"),
        }
    }
}

const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "cookie",
    "set-cookie",
];

const SENSITIVE_FRAGMENTS: &[&str] = &["token", "secret", "api-key", "apikey", "password"];

fn is_sensitive(name: &HeaderName) -> bool {
    let name = name.as_str();
    SENSITIVE_HEADERS.contains(&name)
        || name.ends_with("-key")
        || SENSITIVE_FRAGMENTS.iter().any(|frag| name.contains(frag))
}

fn redacted<'v>(name: &HeaderName, value: &'v HeaderValue) -> &'v str {
    if is_sensitive(name) {
        "<redacted>"
    } else {
        value.to_str().unwrap_or("<non-utf8>")
    }
}
