extern crate self as wozway_core;

pub mod body;
mod builder;
mod client;
pub mod codec;
pub mod debug;
mod endpoint;
pub mod error;
pub mod globals;
pub mod hooks;
pub mod metadata;
pub mod params;
mod request;
pub mod response;
mod secret;
pub mod security;
pub mod serialize;
pub mod server;
mod timeout;
pub mod transport;
pub mod url_builder;

pub use params::Params;
pub use wozway_macros::Params;

pub mod prelude {
    pub use crate::Params;
    pub use crate::builder::{ApiClientBuilder, DEFAULT_USER_AGENT};
    pub use crate::client::ApiClient;
    #[cfg(feature = "json")]
    pub use crate::codec::Json;
    pub use crate::codec::{Binary, Decodes, MediaType, NoContent, Text};
    pub use crate::debug::{
        BodyKind, DebugEvent, DebugLevel, DebugSink, NoopDebugSink, StderrDebugSink,
        TracingDebugSink,
    };
    pub use crate::endpoint::{Decoded, Endpoint, ResponseSpec};
    pub use crate::error::{ApiError, FxError, SdkError};
    pub use crate::globals::Globals;
    pub use crate::hooks::{
        AfterErrorContext, AfterErrorHook, AfterSuccessContext, AfterSuccessHook,
        BeforeRequestContext, BeforeRequestHook, HookContext, Hooks, SdkHooks, SdkInitHook,
    };
    pub use crate::params::{FilePart, ParamValue, ToParam};
    pub use crate::request::PendingRequest;
    pub use crate::secret::SecretString;
    pub use crate::security::{SecurityModel, SecuritySource};
    pub use crate::server::{Server, ServerConfig};
    pub use crate::timeout::TimeoutOverride;
    pub use crate::transport::{
        BoxFuture, DecodedResponse, HttpRequest, HttpResponse, ReqwestTransport, Transport,
        TransportBody, TransportError, TransportResponse,
    };
}

/// Items referenced by `#[derive(Params)]` expansions.
#[doc(hidden)]
pub mod __private {
    pub use crate::body::{self, SerializedRequestBody};
    pub use crate::endpoint::{Decoded, Endpoint};
    pub use crate::error::SdkError;
    pub use crate::metadata::{
        FieldMetadata, FormMetadata, MultipartFormMetadata, ParamMetadata, RequestMetadata,
        SchemeType, SecurityMetadata, Serialization, Style,
    };
    pub use crate::params::{Field, ParamValue, Params, ToParam, json_param};
    pub use bytes::Bytes;
    pub use http::Method;
    pub use std::result::Result;
    pub use std::vec::Vec;
}
