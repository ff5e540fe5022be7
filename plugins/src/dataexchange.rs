//! Off-chain data exchange capability.

use async_trait::async_trait;
use loom_types::Identity;

use crate::{Plugin, PluginConfig, PluginError};

#[async_trait]
pub trait DataExchangePlugin: Plugin {
    /// `nodes` are the node identities already registered in the namespace.
    async fn init(&self, config: &PluginConfig, nodes: &[Identity]) -> Result<(), PluginError>;
}
