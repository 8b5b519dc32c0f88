use crate::client::ApiClient;
use crate::debug::DebugLevel;
use crate::endpoint::{Endpoint, ResponseSpec};
use crate::error::SdkError;
use crate::timeout::TimeoutOverride;
use crate::transport::{BoxFuture, DecodedResponse};
use core::future::IntoFuture;
use std::time::Duration;

/// Per-call settings layered over the client's.
#[derive(Clone, Debug, Default)]
pub(crate) struct RequestOptions {
    pub(crate) debug_level: Option<DebugLevel>,
    pub(crate) timeout: TimeoutOverride,
    pub(crate) server_url: Option<String>,
}

pub struct PendingRequest<'a, E: Endpoint> {
    client: &'a ApiClient,
    ep: E,
    opts: RequestOptions,
}

impl<'a, E: Endpoint> PendingRequest<'a, E> {
    #[inline]
    pub(crate) fn new(client: &'a ApiClient, ep: E) -> Self {
        Self {
            client,
            ep,
            opts: RequestOptions::default(),
        }
    }

    #[inline]
    pub fn debug_level(mut self, level: DebugLevel) -> Self {
        self.opts.debug_level = Some(level);
        self
    }

    #[inline]
    pub fn timeout(mut self, d: Duration) -> Self {
        self.opts.timeout = TimeoutOverride::Set(d);
        self
    }

    #[inline]
    pub fn clear_timeout(mut self) -> Self {
        self.opts.timeout = TimeoutOverride::Clear;
        self
    }

    #[inline]
    pub fn inherit_timeout(mut self) -> Self {
        self.opts.timeout = TimeoutOverride::Inherit;
        self
    }

    /// Sends this call to `url` instead of the client's server.
    #[inline]
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.opts.server_url = Some(url.into());
        self
    }

    #[inline]
    pub async fn execute(self) -> Result<<E::Response as ResponseSpec>::Output, SdkError> {
        Ok(self.execute_decoded().await?.value)
    }

    pub async fn execute_decoded(
        self,
    ) -> Result<DecodedResponse<<E::Response as ResponseSpec>::Output>, SdkError> {
        self.client.execute_decoded_ref(&self.ep, self.opts).await
    }
}

impl<'a, E: Endpoint> IntoFuture for PendingRequest<'a, E> {
    type Output = Result<<E::Response as ResponseSpec>::Output, SdkError>;
    type IntoFuture = BoxFuture<'a, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.execute().await })
    }
}
