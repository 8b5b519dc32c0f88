use crate::error::SdkError;
use crate::params::{ParamValue, ToParam};
use std::fmt;

const MASK: &str = "***";

/// Credential that formats as `***`. The real value only leaves through
/// [`SecretString::expose`] or when serialized into a request.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    #[inline]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[inline]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretString").field(&format_args!("{MASK}")).finish()
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T: Into<String>> From<T> for SecretString {
    #[inline]
    fn from(v: T) -> Self {
        Self::new(v)
    }
}

impl ToParam for SecretString {
    fn to_param(&self) -> Result<ParamValue, SdkError> {
        Ok(ParamValue::Scalar(self.0.clone()))
    }
}
