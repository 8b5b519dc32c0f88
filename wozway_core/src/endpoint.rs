use crate::codec::{Decodes, MediaType};
use crate::params::Params;
use http::Method;
use std::marker::PhantomData;

pub trait ResponseSpec: Send + Sync + 'static {
    type Output: Send + 'static;
    type Dec: Decodes<Self::Output>;

    fn accept_content_type() -> &'static str {
        <Self::Dec as MediaType>::MEDIA_TYPE
    }

    fn is_no_content() -> bool {
        <Self::Dec as MediaType>::MEDIA_TYPE.is_empty()
    }
}

/// (decoder, type) pair.
pub struct Decoded<Dec, T>(PhantomData<(Dec, T)>);

impl<Dec, T> ResponseSpec for Decoded<Dec, T>
where
    Dec: Decodes<T> + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    type Output = T;
    type Dec = Dec;
}

/// One API operation. Implemented by the operation's request struct, whose
/// fields carry the path/query/header/body values.
pub trait Endpoint: Params + Send + Sync + Sized + 'static {
    const OPERATION_ID: &'static str;
    const METHOD: Method;
    /// Path template relative to the server URL, e.g. `/users/{id}`.
    const PATH: &'static str;
    const OAUTH2_SCOPES: &'static [&'static str] = &[];
    const SUCCESS_STATUS_CODES: &'static [&'static str] = &["2XX"];
    const ERROR_STATUS_CODES: &'static [&'static str] = &["4XX", "5XX"];

    type Response: ResponseSpec;

    fn accept_content_type() -> &'static str {
        <Self::Response as ResponseSpec>::accept_content_type()
    }

    fn response_is_no_content() -> bool {
        <Self::Response as ResponseSpec>::is_no_content()
    }
}
