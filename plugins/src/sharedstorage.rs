//! Shared (public) storage capability.

use async_trait::async_trait;

use crate::{Plugin, PluginConfig, PluginError};

#[async_trait]
pub trait SharedStoragePlugin: Plugin {
    async fn init(&self, config: &PluginConfig) -> Result<(), PluginError>;
}
