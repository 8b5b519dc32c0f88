//! Client for the Wozway API.
//!
//! ```no_run
//! # async fn run() -> Result<(), wozway_sdk::SdkError> {
//! let sdk = wozway_sdk::Wozway::builder()
//!     .bearer_auth("token")
//!     .build()?;
//! assert_eq!(sdk.client().server_url(), "https://api.wozway.com");
//! # Ok(())
//! # }
//! ```

mod hooks;
pub mod models;

pub use hooks::register_hooks;
pub use wozway_core::prelude::*;
pub use wozway_core::{Params, prelude};

use std::sync::Arc;
use std::time::Duration;
use wozway_core::server::Server;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const TITLE: &str = "defendai-wozway";
pub const USER_AGENT: &str = concat!("wozway-sdk-rust/", env!("CARGO_PKG_VERSION"));

pub const ENV_SERVER_URL: &str = "WOZWAY_SERVER_URL";
pub const ENV_BEARER_AUTH: &str = "WOZWAY_BEARER_AUTH";

/// Servers the API is reachable on; index 0 is the default.
pub fn servers() -> Vec<Server> {
    vec![Server::new("https://api.wozway.com")]
}

/// Wozway API client.
///
/// Cheap to clone; clones share one transport and hook registry.
#[derive(Clone)]
pub struct Wozway {
    client: ApiClient,
}

impl Wozway {
    #[inline]
    pub fn builder() -> WozwayBuilder {
        WozwayBuilder::new()
    }

    /// Client against the default server, authenticated with `bearer_auth`.
    pub fn new(bearer_auth: impl Into<SecretString>) -> Result<Self, SdkError> {
        Self::builder().bearer_auth(bearer_auth).build()
    }

    #[inline]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[inline]
    pub fn into_client(self) -> ApiClient {
        self.client
    }

    #[inline]
    pub fn request<E: Endpoint>(&self, ep: E) -> PendingRequest<'_, E> {
        self.client.request(ep)
    }
}

/// [`ApiClientBuilder`] preloaded with the Wozway servers, user agent and
/// SDK hooks.
pub struct WozwayBuilder {
    inner: ApiClientBuilder,
}

impl Default for WozwayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WozwayBuilder {
    pub fn new() -> Self {
        Self {
            inner: ApiClientBuilder::new()
                .servers(servers())
                .user_agent(USER_AGENT)
                .configure_hooks(|h| register_hooks(h)),
        }
    }

    /// Reads `WOZWAY_SERVER_URL` and `WOZWAY_BEARER_AUTH`, loading a `.env`
    /// file first when one exists. Unset variables leave the defaults alone.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut builder = Self::new();
        if let Some(url) = env_var(ENV_SERVER_URL) {
            tracing::debug!(target: "wozway", server_url = %url, "server url from env");
            builder = builder.server_url(url);
        }
        if let Some(token) = env_var(ENV_BEARER_AUTH) {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    #[must_use]
    pub fn bearer_auth(self, token: impl Into<SecretString>) -> Self {
        self.security(models::Security {
            bearer_auth: Some(token.into()),
        })
    }

    #[must_use]
    pub fn security(mut self, security: models::Security) -> Self {
        self.inner = self.inner.security(security);
        self
    }

    /// Security resolved again on every call.
    #[must_use]
    pub fn security_source(mut self, source: SecuritySource) -> Self {
        self.inner = self.inner.security_source(source);
        self
    }

    #[must_use]
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.inner = self.inner.server_url(url);
        self
    }

    #[must_use]
    pub fn server_idx(mut self, idx: usize) -> Self {
        self.inner = self.inner.server_idx(idx);
        self
    }

    #[must_use]
    pub fn url_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner = self.inner.url_param(name, value);
        self
    }

    #[must_use]
    pub fn transport<T: Transport>(mut self, transport: T) -> Self {
        self.inner = self.inner.transport(transport);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.inner = self.inner.user_agent(user_agent);
        self
    }

    #[must_use]
    pub fn globals(mut self, globals: Globals) -> Self {
        self.inner = self.inner.globals(globals);
        self
    }

    #[must_use]
    pub fn debug_level(mut self, level: DebugLevel) -> Self {
        self.inner = self.inner.debug_level(level);
        self
    }

    #[must_use]
    pub fn debug_sink<D: DebugSink>(mut self, sink: D) -> Self {
        self.inner = self.inner.debug_sink(sink);
        self
    }

    /// Registers extra hooks after the SDK's own.
    #[must_use]
    pub fn configure_hooks(mut self, f: impl FnOnce(&mut SdkHooks)) -> Self {
        self.inner = self.inner.configure_hooks(f);
        self
    }

    pub fn build(self) -> Result<Wozway, SdkError> {
        Ok(Wozway {
            client: self.inner.build()?,
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    dotenvy::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Shorthand for a dynamic security source built from a token provider.
pub fn bearer_source<F>(provider: F) -> SecuritySource
where
    F: Fn() -> Result<String, FxError> + Send + Sync + 'static,
{
    SecuritySource::from_fn(move || {
        let token = provider()?;
        let model: SecurityModel = Arc::new(models::Security {
            bearer_auth: Some(token.into()),
        });
        Ok(model)
    })
}
