//! Request body serialization. The declared media type picks the method;
//! the method's canonical content type is what gets sent.

use crate::error::SdkError;
use crate::params::ParamValue;
use crate::serialize::form::{FORM_MEDIA_TYPE, encode_form, serialize_form};
use crate::serialize::json::{JSON_MEDIA_TYPE, marshal_json};
use crate::serialize::multipart::{MULTIPART_MEDIA_TYPE, serialize_multipart};
use bytes::Bytes;
use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SerializationMethod {
    Json,
    Form,
    Multipart,
    Raw,
    String,
}

impl SerializationMethod {
    pub const fn content_type(self) -> &'static str {
        match self {
            SerializationMethod::Json => JSON_MEDIA_TYPE,
            SerializationMethod::Form => FORM_MEDIA_TYPE,
            SerializationMethod::Multipart => MULTIPART_MEDIA_TYPE,
            SerializationMethod::Raw => "application/octet-stream",
            SerializationMethod::String => "text/plain",
        }
    }

    /// `(application|text)/..json..`, `multipart/*`, form, `text/plain`, else raw.
    pub fn from_media_type(media_type: &str) -> Self {
        let mt = media_type.trim().to_ascii_lowercase();
        let (ty, sub) = mt.split_once('/').unwrap_or((mt.as_str(), ""));
        if matches!(ty, "application" | "text") && sub.contains("json") {
            SerializationMethod::Json
        } else if ty == "multipart" {
            SerializationMethod::Multipart
        } else if mt.starts_with(FORM_MEDIA_TYPE) {
            SerializationMethod::Form
        } else if mt.starts_with("text/plain") {
            SerializationMethod::String
        } else {
            SerializationMethod::Raw
        }
    }
}

/// Encoded body plus the `Content-Type` it must be sent with.
#[derive(Clone, Debug, PartialEq)]
pub struct SerializedRequestBody {
    pub media_type: String,
    pub content: Bytes,
}

impl SerializedRequestBody {
    #[inline]
    pub fn new(media_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            media_type: media_type.into(),
            content: content.into(),
        }
    }
}

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<SerializedRequestBody, SdkError> {
    Ok(SerializedRequestBody::new(
        SerializationMethod::Json.content_type(),
        marshal_json(value)?,
    ))
}

/// `null` body of a nullable JSON request left unset.
pub fn json_null() -> SerializedRequestBody {
    SerializedRequestBody::new(
        SerializationMethod::Json.content_type(),
        Bytes::from_static(b"null"),
    )
}

pub fn form(value: &ParamValue) -> Result<SerializedRequestBody, SdkError> {
    let values = serialize_form(value)?;
    Ok(SerializedRequestBody::new(
        SerializationMethod::Form.content_type(),
        encode_form(&values),
    ))
}

pub fn multipart(value: &ParamValue) -> Result<SerializedRequestBody, SdkError> {
    let parts = serialize_multipart(value)?;
    Ok(SerializedRequestBody::new(parts.content_type(), parts.encode()))
}

pub fn raw<B: AsRef<[u8]> + ?Sized>(value: &B) -> SerializedRequestBody {
    SerializedRequestBody::new(
        SerializationMethod::Raw.content_type(),
        Bytes::copy_from_slice(value.as_ref()),
    )
}

pub fn string<S: AsRef<str> + ?Sized>(value: &S) -> SerializedRequestBody {
    SerializedRequestBody::new(
        SerializationMethod::String.content_type(),
        Bytes::copy_from_slice(value.as_ref().as_bytes()),
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn media_types_pick_a_method() {
        use SerializationMethod::*;
        for (mt, want) in [
            ("application/json", Json),
            ("application/problem+json", Json),
            ("text/json; charset=utf-8", Json),
            ("multipart/form-data", Multipart),
            ("multipart/mixed", Multipart),
            ("application/x-www-form-urlencoded", Form),
            ("text/plain; charset=utf-8", String),
            ("application/octet-stream", Raw),
            ("image/png", Raw),
        ] {
            assert_eq!(SerializationMethod::from_media_type(mt), want, "{mt}");
        }
    }

    #[test]
    fn bodies_carry_canonical_content_types() {
        assert_eq!(json(&[1, 2]).unwrap().media_type, "application/json");
        assert_eq!(&json_null().content[..], b"null");
        assert_eq!(raw(&[1u8, 2][..]).media_type, "application/octet-stream");
        assert_eq!(string("hi").media_type, "text/plain");
        assert_eq!(&string("hi").content[..], b"hi");
    }
}
