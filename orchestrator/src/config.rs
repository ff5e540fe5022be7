//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use loom_plugins::PluginConfig;

use crate::OrchestratorError;

/// One configured token connector.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPluginConfig {
    /// Connector name, unique within the node.
    pub name: String,

    #[serde(flatten)]
    pub plugin: PluginConfig,
}

/// Configuration for a loom node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Namespace this node operates in; created on first start.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Description stored with the namespace when it is first created.
    #[serde(default = "default_namespace_description")]
    pub namespace_description: String,

    /// DID of this node, used as the author of definition messages.
    #[serde(default)]
    pub node_identity: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Bound of the new-event notification queue.
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,

    #[serde(default)]
    pub database: PluginConfig,

    #[serde(default)]
    pub blockchain: PluginConfig,

    #[serde(default)]
    pub dataexchange: PluginConfig,

    #[serde(default)]
    pub sharedstorage: PluginConfig,

    #[serde(default)]
    pub tokens: Vec<TokenPluginConfig>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_namespace() -> String {
    "default".to_string()
}

fn default_namespace_description() -> String {
    "Default predefined namespace".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_event_queue_capacity() -> usize {
    1024
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, OrchestratorError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| OrchestratorError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, OrchestratorError> {
        let config: Self = toml::from_str(s).map_err(|e| OrchestratorError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, OrchestratorError> {
        toml::to_string_pretty(self).map_err(|e| OrchestratorError::Config(e.to_string()))
    }

    fn check(&self) -> Result<(), OrchestratorError> {
        if self.event_queue_capacity == 0 {
            return Err(OrchestratorError::Config(
                "event_queue_capacity must be at least 1".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for token in &self.tokens {
            if !seen.insert(token.name.as_str()) {
                return Err(OrchestratorError::Config(format!(
                    "duplicate token connector name '{}'",
                    token.name
                )));
            }
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            namespace_description: default_namespace_description(),
            node_identity: String::new(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            event_queue_capacity: default_event_queue_capacity(),
            database: PluginConfig::default(),
            blockchain: PluginConfig::default(),
            dataexchange: PluginConfig::default(),
            sharedstorage: PluginConfig::default(),
            tokens: Vec::new(),
        }
    }
}
