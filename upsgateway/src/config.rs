use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::GatewayError;

/// Key for the global enable flag.
pub const ENABLE_PLUGIN_KEY: &str = "EnablePlugin";
/// Key for the upscaling factor.
pub const SCALE_FACTOR_KEY: &str = "ScaleFactor";
/// The only scale factors the upscaling service accepts.
pub const VALID_SCALE_FACTORS: [u8; 3] = [2, 3, 4];

/// Snapshot of the remote plugin configuration.
///
/// Only `EnablePlugin` and `ScaleFactor` are interpreted locally; every
/// other key is carried through reads and writes untouched, since the
/// server-side configuration holds fields this overlay knows nothing about.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginConfig {
    fields: Map<String, Value>,
}

impl PluginConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a decoded JSON value; anything but an object is refused.
    pub fn from_value(value: Value) -> Result<Self, GatewayError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(GatewayError::NotAnObject(other.to_string())),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Whether upscaling is enabled. Absent or ill-typed reads as false,
    /// matching the fail-soft contract of the gateway.
    pub fn enable_plugin(&self) -> bool {
        self.fields
            .get(ENABLE_PLUGIN_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_enable_plugin(&mut self, enabled: bool) {
        self.fields
            .insert(ENABLE_PLUGIN_KEY.to_string(), Value::Bool(enabled));
    }

    /// The configured scale factor, if present and one of 2, 3, 4.
    pub fn scale_factor(&self) -> Option<u8> {
        self.fields
            .get(SCALE_FACTOR_KEY)
            .and_then(Value::as_u64)
            .and_then(|raw| u8::try_from(raw).ok())
            .filter(|factor| VALID_SCALE_FACTORS.contains(factor))
    }

    pub fn set_scale_factor(&mut self, factor: u8) -> Result<(), GatewayError> {
        if !VALID_SCALE_FACTORS.contains(&factor) {
            return Err(GatewayError::InvalidScaleFactor(factor));
        }
        self.fields
            .insert(SCALE_FACTOR_KEY.to_string(), Value::Number(factor.into()));
        Ok(())
    }

    /// Apply `patch` over this snapshot, patch wins per key.
    pub fn merge(&mut self, patch: &PluginConfig) {
        for (key, value) in &patch.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }
}
