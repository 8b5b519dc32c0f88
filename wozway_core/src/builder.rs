//! Configuration of an [`ApiClient`].

use crate::client::ApiClient;
use crate::debug::{DebugLevel, DebugSink, NoopDebugSink};
use crate::error::SdkError;
use crate::globals::Globals;
use crate::hooks::SdkHooks;
use crate::params::Params;
use crate::security::SecuritySource;
use crate::server::{Server, ServerConfig};
use crate::transport::{ReqwestTransport, Transport};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("wozway-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// Builder for [`ApiClient`]. Nothing is validated until [`build`](Self::build).
#[derive(Default)]
pub struct ApiClientBuilder {
    servers: ServerConfig,
    transport: Option<Arc<dyn Transport>>,
    security: Option<SecuritySource>,
    globals: Option<Globals>,
    hooks: SdkHooks,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    debug_level: DebugLevel,
    debug_sink: Option<Arc<dyn DebugSink>>,
}

impl ApiClientBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Server list the index in [`server_idx`](Self::server_idx) refers to.
    #[must_use]
    pub fn servers(mut self, servers: Vec<Server>) -> Self {
        self.servers = self.servers.servers(servers);
        self
    }

    #[must_use]
    pub fn server_idx(mut self, idx: usize) -> Self {
        self.servers = self.servers.server_idx(idx);
        self
    }

    /// Overrides the server list with a single URL.
    #[must_use]
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.servers = self.servers.server_url(url);
        self
    }

    /// Sets a `{name}` variable of the selected server URL.
    #[must_use]
    pub fn url_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.servers = self.servers.url_param(name, value);
        self
    }

    #[must_use]
    pub fn transport<T: Transport>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    #[must_use]
    pub fn reqwest_client(self, client: reqwest::Client) -> Self {
        self.transport(ReqwestTransport::new(client))
    }

    /// Static security model sent with every request.
    #[must_use]
    pub fn security<S: Params + Send + Sync + 'static>(mut self, security: S) -> Self {
        self.security = Some(SecuritySource::from_static(security));
        self
    }

    #[must_use]
    pub fn security_source(mut self, source: SecuritySource) -> Self {
        self.security = Some(source);
        self
    }

    #[must_use]
    pub fn globals(mut self, globals: Globals) -> Self {
        self.globals = Some(globals);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn debug_level(mut self, level: DebugLevel) -> Self {
        self.debug_level = level;
        self
    }

    #[must_use]
    pub fn debug_sink<D: DebugSink>(mut self, sink: D) -> Self {
        self.debug_sink = Some(Arc::new(sink));
        self
    }

    #[must_use]
    pub fn hooks(mut self, hooks: SdkHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Registers hooks on the builder's registry.
    #[must_use]
    pub fn configure_hooks(mut self, f: impl FnOnce(&mut SdkHooks)) -> Self {
        f(&mut self.hooks);
        self
    }

    /// Resolves the server URL, then runs the `sdk_init` hooks once.
    pub fn build(self) -> Result<ApiClient, SdkError> {
        let server_url = self.servers.server_details()?;
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::default()));
        let (server_url, transport) = self.hooks.sdk_init(server_url, transport);
        if server_url.is_empty() {
            return Err(SdkError::Config("empty server url".into()));
        }
        tracing::debug!(target: "wozway", server_url = %server_url, "client built");

        Ok(ApiClient {
            transport,
            server_url,
            security: self.security,
            globals: self.globals,
            hooks: self.hooks,
            timeout: self.timeout,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            debug_level: self.debug_level,
            debug_sink: self.debug_sink.unwrap_or_else(|| Arc::new(NoopDebugSink)),
        })
    }
}
