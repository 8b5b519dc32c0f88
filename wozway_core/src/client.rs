use crate::builder::ApiClientBuilder;
use crate::codec::Decodes;
use crate::debug::{BodyKind, DebugEvent, DebugLevel, DebugSink};
use crate::endpoint::{Endpoint, ResponseSpec};
use crate::error::{ApiError, SdkError, body_as_text};
use crate::globals::{Globals, resolve_fields};
use crate::hooks::{
    AfterErrorContext, AfterSuccessContext, BeforeRequestContext, HookContext, SdkHooks,
};
use crate::metadata::Channel;
use crate::request::{PendingRequest, RequestOptions};
use crate::response::{match_content_type, match_status_codes};
use crate::security::{SecurityModel, SecuritySource, get_security};
use crate::serialize::FormValues;
use crate::serialize::header::{get_headers, insert_header};
use crate::serialize::query::get_query_params;
use crate::timeout::TimeoutOverride;
use crate::transport::{DecodedResponse, HttpRequest, HttpResponse, Transport, read_to_end};
use crate::url_builder::{generate_url, remove_suffix};
use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Runtime shared by every operation: server, transport, credentials, hooks.
///
/// Cheap to clone; clones share the transport and hooks.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) server_url: String,
    pub(crate) security: Option<SecuritySource>,
    pub(crate) globals: Option<Globals>,
    pub(crate) hooks: SdkHooks,
    pub(crate) timeout: Option<Duration>,
    pub(crate) user_agent: String,
    pub(crate) debug_level: DebugLevel,
    pub(crate) debug_sink: Arc<dyn DebugSink>,
}

impl ApiClient {
    #[inline]
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    /// Base URL after `sdk_init` hooks ran.
    #[inline]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    #[inline]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    #[inline]
    pub fn hooks(&self) -> &SdkHooks {
        &self.hooks
    }

    #[inline]
    pub fn globals(&self) -> Option<&Globals> {
        self.globals.as_ref()
    }

    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[inline]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[inline]
    pub fn debug_level(&self) -> DebugLevel {
        self.debug_level
    }

    #[inline]
    pub fn set_debug_level(&mut self, level: DebugLevel) {
        self.debug_level = level;
    }

    #[inline]
    pub fn with_debug_level(mut self, level: DebugLevel) -> Self {
        self.debug_level = level;
        self
    }

    #[inline]
    pub fn set_security(&mut self, security: Option<SecuritySource>) {
        self.security = security;
    }

    #[inline]
    pub fn request<E: Endpoint>(&self, ep: E) -> PendingRequest<'_, E> {
        PendingRequest::new(self, ep)
    }

    pub(crate) async fn execute_decoded_ref<E: Endpoint>(
        &self,
        ep: &E,
        opts: RequestOptions,
    ) -> Result<DecodedResponse<<E::Response as ResponseSpec>::Output>, SdkError> {
        let dbg = opts.debug_level.unwrap_or(self.debug_level);
        let result = self.run(ep, opts, dbg).await;
        if let Err(e) = &result {
            self.trace(
                dbg,
                DebugEvent::Failed {
                    operation_id: E::OPERATION_ID,
                    error: e,
                },
            );
        }
        result.map_err(|e| SdkError::in_operation(E::OPERATION_ID, e))
    }

    async fn run<E: Endpoint>(
        &self,
        ep: &E,
        opts: RequestOptions,
        dbg: DebugLevel,
    ) -> Result<DecodedResponse<<E::Response as ResponseSpec>::Output>, SdkError> {
        let ctx = HookContext {
            operation_id: E::OPERATION_ID,
            oauth2_scopes: E::OAUTH2_SCOPES,
            security_source: self.security.clone(),
        };
        let security = self.security.as_ref().map(SecuritySource::resolve).transpose()?;
        let base_url = match opts.server_url.as_deref() {
            Some(url) => remove_suffix(url, "/"),
            None => self.server_url.as_str(),
        };
        let request = self.build_request(ep, base_url, security.as_ref(), opts.timeout)?;
        let resp = self.do_request::<E>(ctx, request, dbg).await?;
        Self::decode_response::<E>(resp)
    }

    fn build_request<E: Endpoint>(
        &self,
        ep: &E,
        base_url: &str,
        security: Option<&SecurityModel>,
        timeout: TimeoutOverride,
    ) -> Result<HttpRequest, SdkError> {
        let fields = ep.fields()?;
        let globals = self.globals.as_ref();

        let url = generate_url(base_url, E::PATH, &fields, globals)?;
        let mut url = Url::parse(&url)?;

        let mut query = FormValues::new();
        get_query_params(&resolve_fields(&fields, globals, Channel::Query), &mut query)?;

        let mut headers = get_headers(&resolve_fields(&fields, globals, Channel::Header))?;
        insert_header(&mut headers, USER_AGENT.as_str(), &self.user_agent)?;
        let accept = E::accept_content_type();
        if E::METHOD != http::Method::HEAD && !accept.is_empty() {
            insert_header(&mut headers, ACCEPT.as_str(), accept)?;
        }

        let body = ep.request_body()?;
        if let Some(body) = body.as_ref()
            && !headers.contains_key(CONTENT_TYPE)
        {
            insert_header(&mut headers, CONTENT_TYPE.as_str(), &body.media_type)?;
        }

        if let Some(model) = security {
            let sec = get_security(&**model)?;
            for (k, v) in sec.headers.iter() {
                headers.insert(k.clone(), v.clone());
            }
            query.merge(sec.query);
        }

        if !query.is_empty() {
            let mut qp = url.query_pairs_mut();
            for (k, v) in query.pairs() {
                qp.append_pair(k, v);
            }
        }

        Ok(HttpRequest {
            operation_id: E::OPERATION_ID,
            method: E::METHOD,
            url,
            headers,
            body: body.map(|b| b.content),
            timeout: timeout.resolve(self.timeout),
        })
    }

    /// Hooks around one round trip. Returns the response to decode.
    async fn do_request<E: Endpoint>(
        &self,
        ctx: HookContext,
        request: HttpRequest,
        dbg: DebugLevel,
    ) -> Result<HttpResponse, SdkError> {
        let sent = match self
            .hooks
            .before_request(&BeforeRequestContext::new(ctx.clone()), request)
        {
            Ok(req) => self.send(req, dbg).await,
            Err(e) => Err(e),
        };

        let resp = match sent {
            Ok(resp) => resp,
            Err(e) => {
                // with nothing received, a response handed back here is dropped
                let (_, err) =
                    self.hooks
                        .after_error(&AfterErrorContext::new(ctx), None, Some(e))?;
                return Err(err.unwrap_or_else(|| ApiError::new("No response received").into()));
            }
        };

        let is_error = match_status_codes(E::ERROR_STATUS_CODES, resp.status);
        self.trace(
            dbg,
            DebugEvent::Response {
                status: resp.status,
                url: resp.url.as_str(),
                is_error,
            },
        );
        self.trace(dbg, DebugEvent::ResponseHeaders(&resp.headers));
        self.trace(
            dbg,
            DebugEvent::ResponseBody {
                body: &resp.body,
                kind: BodyKind::of(resp.content_type()),
            },
        );

        if is_error {
            let failed = resp.clone();
            let (replaced, err) =
                self.hooks
                    .after_error(&AfterErrorContext::new(ctx), Some(resp), None)?;
            if let Some(err) = err {
                return Err(err);
            }
            return replaced.ok_or_else(|| {
                ApiError::from_response("Unexpected error occurred", &failed).into()
            });
        }

        self.hooks
            .after_success(&AfterSuccessContext::new(ctx), resp)
    }

    async fn send(&self, req: HttpRequest, dbg: DebugLevel) -> Result<HttpResponse, SdkError> {
        self.trace(
            dbg,
            DebugEvent::Request {
                operation_id: req.operation_id,
                method: &req.method,
                url: req.url.as_str(),
            },
        );
        self.trace(dbg, DebugEvent::RequestHeaders(&req.headers));
        if let Some(body) = req.body.as_ref() {
            let ct = req
                .headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            self.trace(
                dbg,
                DebugEvent::RequestBody {
                    body,
                    kind: BodyKind::of(ct),
                },
            );
        }

        let mut resp = self.transport.send(&req).await?;
        let body = read_to_end(resp.body.as_mut(), resp.content_length).await?;
        Ok(HttpResponse {
            url: req.url,
            status: resp.status,
            headers: resp.headers,
            body,
        })
    }

    #[inline]
    fn trace(&self, dbg: DebugLevel, event: DebugEvent<'_>) {
        if dbg.is_enabled() && dbg >= event.level() {
            self.debug_sink.record(dbg, &event);
        }
    }

    fn decode_response<E: Endpoint>(
        resp: HttpResponse,
    ) -> Result<DecodedResponse<<E::Response as ResponseSpec>::Output>, SdkError> {
        let content_type = resp.content_type();
        if match_status_codes(E::SUCCESS_STATUS_CODES, resp.status)
            && (E::response_is_no_content()
                || match_content_type(content_type, E::accept_content_type()))
        {
            let value = <<E::Response as ResponseSpec>::Dec as Decodes<
                <E::Response as ResponseSpec>::Output,
            >>::decode(&resp.body)
            .map_err(|e| SdkError::Decode {
                source: e.into(),
                body: body_as_text(&resp.headers, &resp.body, None),
            })?;
            return Ok(DecodedResponse {
                url: resp.url,
                status: resp.status,
                headers: resp.headers,
                value,
            });
        }

        let message = if match_status_codes(E::ERROR_STATUS_CODES, resp.status) {
            "API error occurred".to_string()
        } else {
            format!(
                "Unexpected response received (code: {}, type: {})",
                resp.status.as_u16(),
                content_type
            )
        };
        Err(ApiError::from_response(message, &resp).into())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::Binary;
    use crate::endpoint::Decoded;
    use crate::params::{Field, Params};
    use bytes::Bytes;
    use http::{HeaderMap, HeaderValue, StatusCode};

    struct Download;

    impl Params for Download {
        fn fields(&self) -> Result<Vec<Field>, SdkError> {
            Ok(Vec::new())
        }
    }

    impl Endpoint for Download {
        const OPERATION_ID: &'static str = "download";
        const METHOD: http::Method = http::Method::GET;
        const PATH: &'static str = "/files/latest";
        const SUCCESS_STATUS_CODES: &'static [&'static str] = &["200"];
        type Response = Decoded<Binary, Bytes>;
    }

    fn response(status: u16, content_type: &'static str, body: &'static [u8]) -> HttpResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        HttpResponse {
            url: Url::parse("https://h/files/latest").unwrap(),
            status: StatusCode::from_u16(status).unwrap(),
            headers,
            body: Bytes::from_static(body),
        }
    }

    #[test]
    fn decodes_declared_success() {
        let out =
            ApiClient::decode_response::<Download>(response(200, "application/octet-stream", b"\x00\x01"))
                .unwrap();
        assert_eq!(out.value.as_ref(), b"\x00\x01");
    }

    #[test]
    fn undeclared_success_code_is_unexpected() {
        let err =
            ApiClient::decode_response::<Download>(response(206, "application/octet-stream", b""))
                .unwrap_err();
        let api = err.api_error().unwrap();
        assert_eq!(
            api.message,
            "Unexpected response received (code: 206, type: application/octet-stream)"
        );
        assert_eq!(api.status_code, 206);
    }

    #[test]
    fn error_status_becomes_api_error_with_body() {
        let err = ApiClient::decode_response::<Download>(response(
            404,
            "application/json",
            b"{\"detail\":\"gone\"}",
        ))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "API error occurred: Status 404\n{\"detail\":\"gone\"}"
        );
    }
}
