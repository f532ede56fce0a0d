//! Remote plugin-configuration plumbing for the upscaler overlay.
//!
//! The host server owns the configuration; the overlay never keeps a
//! persistent local copy. Every read fetches a fresh snapshot and every
//! write merges a partial patch over such a snapshot before submitting it
//! back (last writer wins, no conflict detection).

pub mod api;
pub mod config;
pub mod errors;
pub mod gateway;

pub use api::{ConfigApi, HttpConfigApi, UPSCALER_PLUGIN_ID};
pub use config::PluginConfig;
pub use errors::GatewayError;
pub use gateway::ConfigGateway;
