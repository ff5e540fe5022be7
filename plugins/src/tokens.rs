//! Token connector capability.

use async_trait::async_trait;

use crate::{Plugin, PluginConfig, PluginError};

#[async_trait]
pub trait TokensPlugin: Plugin {
    /// `name` is the configured connector name, distinct from the plugin type.
    async fn init(&self, name: &str, config: &PluginConfig) -> Result<(), PluginError>;
}
