//! Response decoders. Each one names the media type it accepts.

use bytes::Bytes;
use std::convert::Infallible;
use std::string::FromUtf8Error;

/// Media type a decoder negotiates.
pub trait MediaType {
    /// Sent as `Accept` and matched against the response `Content-Type`.
    /// Empty for bodiless responses, which are decoded whatever they carry.
    const MEDIA_TYPE: &'static str;
}

pub trait Decodes<T>: MediaType {
    type Error: std::error::Error + Send + Sync + 'static;

    fn decode(body: &Bytes) -> Result<T, Self::Error>;
}

/// Bodiless responses (`204`, `HEAD`, operations without a response model).
pub struct NoContent;

impl MediaType for NoContent {
    const MEDIA_TYPE: &'static str = "";
}

impl Decodes<()> for NoContent {
    type Error = Infallible;

    fn decode(_: &Bytes) -> Result<(), Infallible> {
        Ok(())
    }
}

/// `application/json` into any `DeserializeOwned` model.
#[cfg(feature = "json")]
pub struct Json;

#[cfg(feature = "json")]
impl MediaType for Json {
    const MEDIA_TYPE: &'static str = "application/json";
}

#[cfg(feature = "json")]
impl<T: serde::de::DeserializeOwned> Decodes<T> for Json {
    type Error = serde_json::Error;

    fn decode(body: &Bytes) -> Result<T, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// `text/plain` into a `String`; invalid UTF-8 is an error.
pub struct Text;

impl MediaType for Text {
    const MEDIA_TYPE: &'static str = "text/plain";
}

impl Decodes<String> for Text {
    type Error = FromUtf8Error;

    fn decode(body: &Bytes) -> Result<String, FromUtf8Error> {
        String::from_utf8(body.to_vec())
    }
}

/// `application/octet-stream` downloads, handed over untouched.
pub struct Binary;

impl MediaType for Binary {
    const MEDIA_TYPE: &'static str = "application/octet-stream";
}

impl Decodes<Bytes> for Binary {
    type Error = Infallible;

    fn decode(body: &Bytes) -> Result<Bytes, Infallible> {
        Ok(body.clone())
    }
}
