use crate::error::SdkError;
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const JSON_MEDIA_TYPE: &str = "application/json";

#[inline]
pub fn marshal_json<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, SdkError> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

#[inline]
pub fn unmarshal_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SdkError> {
    Ok(serde_json::from_slice(bytes)?)
}
