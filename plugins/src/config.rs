//! Per-plugin configuration sections.

use serde::{Deserialize, Serialize};

/// One plugin's section of the node configuration.
///
/// `type` selects the implementation; every other key is handed to the
/// plugin's `init` untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(rename = "type", default)]
    pub plugin_type: String,
    #[serde(flatten)]
    pub settings: toml::Table,
}

impl PluginConfig {
    pub fn new(plugin_type: impl Into<String>) -> Self {
        Self {
            plugin_type: plugin_type.into(),
            settings: toml::Table::new(),
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(|v| v.as_str())
    }
}
