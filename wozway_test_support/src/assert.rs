//! Chained assertions over a [`SentRequest`].
//!
//! Every failure message ends with the request line so a broken chain shows
//! which call it was looking at.

use crate::mock::SentRequest;
use http::header::HeaderName;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

pub fn assert_request(req: &SentRequest) -> RequestAssert<'_> {
    RequestAssert { req }
}

pub struct RequestAssert<'a> {
    req: &'a SentRequest,
}

fn header_name<N>(name: N) -> HeaderName
where
    N: TryInto<HeaderName>,
    N::Error: fmt::Debug,
{
    name.try_into().expect("valid header name")
}

impl RequestAssert<'_> {
    #[track_caller]
    fn fail(&self, what: fmt::Arguments<'_>) -> ! {
        panic!(
            "{what}\n  request: {} {} ({})",
            self.req.method, self.req.url, self.req.operation_id
        )
    }

    #[track_caller]
    fn same<T: PartialEq + fmt::Debug + ?Sized>(&self, what: &str, want: &T, got: &T) {
        if want != got {
            self.fail(format_args!("{what} differs\n  want: {want:?}\n  got:  {got:?}"));
        }
    }

    #[track_caller]
    fn body(&self) -> String {
        match self.req.body_lossy() {
            Some(body) => body,
            None => self.fail(format_args!("request has no body")),
        }
    }

    #[track_caller]
    pub fn operation(self, want: &str) -> Self {
        self.same("operation", want, self.req.operation_id);
        self
    }

    #[track_caller]
    pub fn method(self, want: http::Method) -> Self {
        self.same("method", &want, &self.req.method);
        self
    }

    #[track_caller]
    pub fn host(self, want: &str) -> Self {
        self.same("host", &Some(want), &self.req.url.host_str());
        self
    }

    #[track_caller]
    pub fn path(self, want: &str) -> Self {
        self.same("path", want, self.req.url.path());
        self
    }

    /// Raw query string exactly as encoded on the wire.
    #[track_caller]
    pub fn query_string(self, want: &str) -> Self {
        self.same("query string", want, self.req.url.query().unwrap_or(""));
        self
    }

    /// Decoded values of every `key` pair, in order.
    #[track_caller]
    pub fn query_values(self, key: &str, want: &[&str]) -> Self {
        let pairs = self.req.query_pairs();
        let got: Vec<&str> = pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect();
        self.same(&format!("query `{key}`"), want, &got[..]);
        self
    }

    #[track_caller]
    pub fn query_absent(self, key: &str) -> Self {
        if self.req.query_pairs().iter().any(|(k, _)| k == key) {
            self.fail(format_args!("query `{key}` should be absent"));
        }
        self
    }

    /// The set of query keys, ignoring order and repeats.
    #[track_caller]
    pub fn query_keys_exact(self, want: &[&str]) -> Self {
        let got: BTreeSet<String> = self.req.query_pairs().into_iter().map(|(k, _)| k).collect();
        let want: BTreeSet<String> = want.iter().map(|k| k.to_string()).collect();
        self.same("query keys", &want, &got);
        self
    }

    #[track_caller]
    pub fn header<N>(self, name: N, want: &str) -> Self
    where
        N: TryInto<HeaderName>,
        N::Error: fmt::Debug,
    {
        let name = header_name(name);
        let got = self.req.header_str(name.as_str());
        self.same(&format!("header `{name}`"), &Some(want), &got);
        self
    }

    #[track_caller]
    pub fn header_starts_with<N>(self, name: N, prefix: &str) -> Self
    where
        N: TryInto<HeaderName>,
        N::Error: fmt::Debug,
    {
        let name = header_name(name);
        let got = self.req.header_str(name.as_str());
        if !got.is_some_and(|v| v.starts_with(prefix)) {
            self.fail(format_args!(
                "header `{name}` should start with {prefix:?}, got {got:?}"
            ));
        }
        self
    }

    #[track_caller]
    pub fn header_absent<N>(self, name: N) -> Self
    where
        N: TryInto<HeaderName>,
        N::Error: fmt::Debug,
    {
        let name = header_name(name);
        if let Some(v) = self.req.headers.get(&name) {
            self.fail(format_args!("header `{name}` should be absent, got {v:?}"));
        }
        self
    }

    #[track_caller]
    pub fn timeout(self, want: Option<Duration>) -> Self {
        self.same("timeout", &want, &self.req.timeout);
        self
    }

    #[track_caller]
    pub fn body_absent(self) -> Self {
        if let Some(body) = &self.req.body {
            self.fail(format_args!("body should be absent, got {} bytes", body.len()));
        }
        self
    }

    #[track_caller]
    pub fn body_text(self, want: &str) -> Self {
        self.same("body", want, self.body().as_str());
        self
    }

    #[track_caller]
    pub fn body_contains(self, needle: &str) -> Self {
        let body = self.body();
        if !body.contains(needle) {
            self.fail(format_args!("body lacks {needle:?}\n  body: {body:?}"));
        }
        self
    }

    /// Compares the body as JSON, so key order and spacing do not matter.
    #[track_caller]
    pub fn body_json(self, want: serde_json::Value) -> Self {
        let got: serde_json::Value = match serde_json::from_str(&self.body()) {
            Ok(v) => v,
            Err(e) => self.fail(format_args!("body is not json: {e}")),
        };
        self.same("json body", &want, &got);
        self
    }
}
