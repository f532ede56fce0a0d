use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use ureq::Agent;
use uuid::{Uuid, uuid};

use crate::config::PluginConfig;
use crate::errors::GatewayError;

/// Identifier under which the host registers the upscaler plugin.
pub const UPSCALER_PLUGIN_ID: Uuid = uuid!("f87f700e-679d-43e6-9c7c-b3a410dc3f22");

/// Relative path of the upscaling service status endpoint.
pub const STATUS_PATH: &str = "api/Upscaler/status";

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport seam to the host's plugin-configuration API.
///
/// The production implementation talks HTTP to the host server; tests plug
/// in an in-process implementation to drive the overlay deterministically.
pub trait ConfigApi: Send + Sync {
    /// Fetch the configuration stored for `plugin`.
    fn fetch(&self, plugin: &Uuid) -> Result<PluginConfig, GatewayError>;

    /// Persist a full configuration snapshot for `plugin`.
    fn submit(&self, plugin: &Uuid, config: &PluginConfig) -> Result<(), GatewayError>;

    /// Fetch the upscaling service status payload, verbatim.
    fn status(&self) -> Result<Value, GatewayError>;
}

impl<A: ConfigApi + ?Sized> ConfigApi for &A {
    fn fetch(&self, plugin: &Uuid) -> Result<PluginConfig, GatewayError> {
        (**self).fetch(plugin)
    }

    fn submit(&self, plugin: &Uuid, config: &PluginConfig) -> Result<(), GatewayError> {
        (**self).submit(plugin, config)
    }

    fn status(&self) -> Result<Value, GatewayError> {
        (**self).status()
    }
}

impl<A: ConfigApi + ?Sized> ConfigApi for std::sync::Arc<A> {
    fn fetch(&self, plugin: &Uuid) -> Result<PluginConfig, GatewayError> {
        (**self).fetch(plugin)
    }

    fn submit(&self, plugin: &Uuid, config: &PluginConfig) -> Result<(), GatewayError> {
        (**self).submit(plugin, config)
    }

    fn status(&self) -> Result<Value, GatewayError> {
        (**self).status()
    }
}

/// HTTP implementation of [`ConfigApi`] against a host server.
///
/// - `GET  {base}/Plugins/{id}/Configuration`
/// - `POST {base}/Plugins/{id}/Configuration`
/// - `GET  {base}/api/Upscaler/status`
pub struct HttpConfigApi {
    base_url: String,
    access_token: Option<String>,
    agent: Agent,
}

impl HttpConfigApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
            agent: config.into(),
        }
    }

    /// Authenticate requests with the session token the host handed out.
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    fn configuration_url(&self, plugin: &Uuid) -> String {
        format!("{}/Plugins/{}/Configuration", self.base_url, plugin)
    }

    fn get_json(&self, url: &str) -> Result<Value, GatewayError> {
        let mut request = self.agent.get(url);
        if let Some(token) = &self.access_token {
            request = request.header("X-Emby-Token", token);
        }

        let mut response = request.call()?;
        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl ConfigApi for HttpConfigApi {
    fn fetch(&self, plugin: &Uuid) -> Result<PluginConfig, GatewayError> {
        let url = self.configuration_url(plugin);
        debug!(%url, "Fetching plugin configuration");
        PluginConfig::from_value(self.get_json(&url)?)
    }

    fn submit(&self, plugin: &Uuid, config: &PluginConfig) -> Result<(), GatewayError> {
        let url = self.configuration_url(plugin);
        debug!(%url, "Submitting plugin configuration");

        let body = serde_json::to_string(config)?;
        let mut request = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.access_token {
            request = request.header("X-Emby-Token", token);
        }

        request.send(body)?;
        Ok(())
    }

    fn status(&self) -> Result<Value, GatewayError> {
        let url = format!("{}/{}", self.base_url, STATUS_PATH);
        debug!(%url, "Fetching upscaler status");
        self.get_json(&url)
    }
}
