use crate::error::SdkError;
use crate::url_builder::{remove_suffix, template_url};
use std::borrow::Cow;

/// One entry of the API's server list, with default values for its `{vars}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Server {
    pub url: Cow<'static, str>,
    pub variables: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl Server {
    pub const fn new(url: &'static str) -> Self {
        Self {
            url: Cow::Borrowed(url),
            variables: Vec::new(),
        }
    }

    pub fn with_variable(
        mut self,
        name: impl Into<Cow<'static, str>>,
        default: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.variables.push((name.into(), default.into()));
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServerConfig {
    servers: Vec<Server>,
    server_idx: usize,
    server_url: Option<String>,
    url_params: Vec<(String, String)>,
}

impl ServerConfig {
    pub fn new(servers: Vec<Server>) -> Self {
        Self {
            servers,
            ..Default::default()
        }
    }

    pub fn servers(mut self, servers: Vec<Server>) -> Self {
        self.servers = servers;
        self
    }

    pub fn server_idx(mut self, idx: usize) -> Self {
        self.server_idx = idx;
        self
    }

    /// Replaces the server list entirely.
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Overrides a server variable (or fills a `{var}` of `server_url`).
    pub fn url_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.url_params.iter_mut().find(|slot| slot.0 == name) {
            Some(slot) => slot.1 = value,
            None => self.url_params.push((name, value)),
        }
        self
    }

    /// Effective base URL.
    pub fn server_details(&self) -> Result<String, SdkError> {
        if let Some(url) = self.server_url.as_deref().filter(|u| !u.is_empty()) {
            let url = remove_suffix(url, "/");
            return Ok(template_url(
                url,
                self.url_params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            ));
        }
        let server = self.servers.get(self.server_idx).ok_or_else(|| {
            SdkError::Config(
                format!(
                    "server index {} out of range (servers={})",
                    self.server_idx,
                    self.servers.len()
                )
                .into(),
            )
        })?;
        let mut vars: Vec<(&str, &str)> = server
            .variables
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .collect();
        for (k, v) in &self.url_params {
            match vars.iter_mut().find(|slot| slot.0 == k.as_str()) {
                Some(slot) => slot.1 = v.as_str(),
                None => vars.push((k.as_str(), v.as_str())),
            }
        }
        Ok(remove_suffix(&template_url(&server.url, vars), "/").to_string())
    }
}
