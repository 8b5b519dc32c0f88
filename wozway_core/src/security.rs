//! Credential attachment from a security model.

use crate::error::{FxError, SdkError};
use crate::metadata::{SchemeType, SecurityMetadata};
use crate::params::{Field, ParamValue, Params};
use crate::serialize::FormValues;
use crate::serialize::header::insert_header;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::HeaderMap;
use http::header::{AUTHORIZATION, COOKIE, HeaderValue};
use std::fmt;
use std::sync::Arc;

pub type SecurityModel = Arc<dyn Params + Send + Sync>;

type SecurityProvider = dyn Fn() -> Result<SecurityModel, FxError> + Send + Sync;

/// Where the client gets its security model: fixed, or asked for on every call.
#[derive(Clone)]
pub enum SecuritySource {
    Static(SecurityModel),
    Dynamic(Arc<SecurityProvider>),
}

impl SecuritySource {
    pub fn from_static<S: Params + Send + Sync + 'static>(security: S) -> Self {
        SecuritySource::Static(Arc::new(security))
    }

    pub fn from_fn<F>(provider: F) -> Self
    where
        F: Fn() -> Result<SecurityModel, FxError> + Send + Sync + 'static,
    {
        SecuritySource::Dynamic(Arc::new(provider))
    }

    pub fn resolve(&self) -> Result<SecurityModel, SdkError> {
        match self {
            SecuritySource::Static(s) => Ok(s.clone()),
            SecuritySource::Dynamic(f) => {
                f().map_err(|e| SdkError::Security(format!("security provider failed: {e}").into()))
            }
        }
    }
}

impl fmt::Debug for SecuritySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecuritySource::Static(_) => f.write_str("SecuritySource::Static(..)"),
            SecuritySource::Dynamic(_) => f.write_str("SecuritySource::Dynamic(..)"),
        }
    }
}

/// Headers and query params produced by a security model.
#[derive(Clone, Debug, Default)]
pub struct SecurityParams {
    pub headers: HeaderMap,
    pub query: FormValues,
}

impl SecurityParams {
    fn bearer(&mut self, name: &str, token: &str) -> Result<(), SdkError> {
        insert_header(&mut self.headers, name, &apply_bearer(token))
    }

    fn cookie(&mut self, name: &str, value: &str) -> Result<(), SdkError> {
        let pair = format!("{}={}", name, value);
        let joined = match self.headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
            Some(prev) => format!("{}; {}", prev, pair),
            None => pair,
        };
        let value = HeaderValue::from_str(&joined).map_err(|_| SdkError::InvalidHeader {
            name: COOKIE.as_str().to_string(),
            reason: "invalid header value",
        })?;
        self.headers.insert(COOKIE, value);
        Ok(())
    }
}

/// `Bearer <token>`, unless the token already carries the prefix.
pub fn apply_bearer(token: &str) -> String {
    let prefixed = token
        .get(..7)
        .is_some_and(|p| p.eq_ignore_ascii_case("bearer "));
    if prefixed {
        token.to_string()
    } else {
        format!("Bearer {}", token)
    }
}

pub fn get_security<S: Params + ?Sized>(security: &S) -> Result<SecurityParams, SdkError> {
    let mut out = SecurityParams::default();
    let fields = security.fields()?;
    for field in &fields {
        if !field.value.is_set() {
            continue;
        }
        let Some(meta) = field.metadata.security.as_ref() else {
            continue;
        };
        if meta.option {
            parse_option(&mut out, &field.value)?;
            return Ok(out);
        }
        if meta.scheme {
            // basic/custom schemes may be flattened into the security model itself
            let flattened = matches!(meta.sub_type, Some("basic" | "custom"))
                && !matches!(field.value, ParamValue::Object(_));
            if flattened {
                parse_scheme(&mut out, meta, field.wire_name, &ParamValue::Object(fields.clone()))?;
            } else {
                parse_scheme(&mut out, meta, field.wire_name, &field.value)?;
            }
        }
    }
    Ok(out)
}

fn parse_option(out: &mut SecurityParams, option: &ParamValue) -> Result<(), SdkError> {
    let ParamValue::Object(schemes) = option else {
        return Err(SdkError::Security(
            format!("security option must be an object, got {}", option.type_name()).into(),
        ));
    };
    for field in schemes {
        let Some(meta) = field.metadata.security.as_ref().filter(|m| m.scheme) else {
            continue;
        };
        if !field.value.is_set() {
            continue;
        }
        parse_scheme(out, meta, field.wire_name, &field.value)?;
    }
    Ok(())
}

fn parse_scheme(
    out: &mut SecurityParams,
    scheme: &SecurityMetadata,
    field_name: &str,
    value: &ParamValue,
) -> Result<(), SdkError> {
    let ParamValue::Object(members) = value else {
        return parse_scheme_value(out, scheme, scheme, field_name, value);
    };
    if scheme.scheme_type == Some(SchemeType::Http) {
        match scheme.sub_type {
            Some("basic") => return parse_basic_auth(out, members),
            Some("custom") => return Ok(()),
            _ => {}
        }
    }
    for m in members {
        let Some(meta) = m.metadata.security.as_ref() else {
            continue;
        };
        if meta.field_name.is_none() {
            continue;
        }
        parse_scheme_value(out, scheme, meta, m.wire_name, &m.value)?;
    }
    Ok(())
}

fn parse_scheme_value(
    out: &mut SecurityParams,
    scheme: &SecurityMetadata,
    meta: &SecurityMetadata,
    field_name: &str,
    value: &ParamValue,
) -> Result<(), SdkError> {
    if !value.is_set() {
        return Ok(());
    }
    let name = meta.field_name_or(field_name);
    let value = value.flat_string();
    let sub_type = scheme.sub_type.unwrap_or("");
    match scheme.scheme_type {
        Some(SchemeType::ApiKey) => match sub_type {
            "header" => insert_header(&mut out.headers, name, &value),
            "query" => {
                out.query.set(name, vec![value]);
                Ok(())
            }
            "cookie" => out.cookie(name, &value),
            other => Err(SdkError::Security(
                format!("apiKey sub type {other:?} not supported").into(),
            )),
        },
        Some(SchemeType::OpenIdConnect) => out.bearer(name, &value),
        Some(SchemeType::OAuth2) => {
            if sub_type == "client_credentials" {
                return Ok(());
            }
            out.bearer(name, &value)
        }
        Some(SchemeType::Http) => match sub_type {
            "bearer" => out.bearer(name, &value),
            "custom" => Ok(()),
            other => Err(SdkError::Security(
                format!("http sub type {other:?} not supported").into(),
            )),
        },
        None => Err(SdkError::Security(
            format!("missing scheme type (field={field_name})").into(),
        )),
    }
}

fn parse_basic_auth(out: &mut SecurityParams, members: &[Field]) -> Result<(), SdkError> {
    let mut username = String::new();
    let mut password = String::new();
    for m in members {
        let Some(field_name) = m.metadata.security.as_ref().and_then(|s| s.field_name) else {
            continue;
        };
        match field_name {
            "username" => username = m.value.flat_string(),
            "password" => password = m.value.flat_string(),
            _ => {}
        }
    }
    let encoded = STANDARD.encode(format!("{}:{}", username, password));
    insert_header(&mut out.headers, AUTHORIZATION.as_str(), &format!("Basic {}", encoded))
}
