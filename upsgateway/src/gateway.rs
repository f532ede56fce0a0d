use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::{ConfigApi, UPSCALER_PLUGIN_ID};
use crate::config::PluginConfig;
use crate::errors::GatewayError;

/// Read/write access to the remote plugin configuration.
///
/// Reads fail soft: a host that is unreachable or answers garbage yields an
/// empty configuration instead of an error, so the overlay keeps working
/// with defaulted fields. Writes are read-merge-write over a fresh
/// snapshot; there is no compare-and-swap, the last writer wins.
pub struct ConfigGateway<A: ConfigApi> {
    api: A,
    plugin: Uuid,
}

impl<A: ConfigApi> ConfigGateway<A> {
    pub fn new(api: A) -> Self {
        Self::for_plugin(api, UPSCALER_PLUGIN_ID)
    }

    pub fn for_plugin(api: A, plugin: Uuid) -> Self {
        Self { api, plugin }
    }

    /// Fetch the current configuration snapshot.
    ///
    /// Never fails: transport and decode errors degrade to an empty
    /// mapping, logged at warn level. Callers must treat every field as
    /// possibly absent.
    pub fn read(&self) -> PluginConfig {
        match self.api.fetch(&self.plugin) {
            Ok(config) => config,
            Err(err) => {
                warn!(plugin = %self.plugin, error = %err,
                    "Configuration read failed, falling back to empty config");
                PluginConfig::new()
            }
        }
    }

    /// Merge `patch` over a fresh snapshot and persist the result.
    ///
    /// Returns the merged configuration that was submitted, so callers can
    /// re-render UI state from what the host now holds.
    pub fn update(&self, patch: &PluginConfig) -> Result<PluginConfig, GatewayError> {
        let mut merged = self.read();
        merged.merge(patch);
        self.api.submit(&self.plugin, &merged)?;
        debug!(plugin = %self.plugin, "Plugin configuration updated");
        Ok(merged)
    }

    /// Fetch the upscaling service status payload.
    ///
    /// Unlike [`read`](Self::read) this propagates the error; the caller
    /// owns the user-facing fallback message.
    pub fn status(&self) -> Result<Value, GatewayError> {
        self.api.status()
    }
}
