//! Ledger (blockchain) capability.

use std::sync::Arc;

use async_trait::async_trait;
use loom_types::{NetworkActionType, SystemContracts};

use crate::{Metrics, Plugin, PluginConfig, PluginError};

#[async_trait]
pub trait BlockchainPlugin: Plugin {
    async fn init(&self, config: &PluginConfig, metrics: Arc<Metrics>) -> Result<(), PluginError>;

    /// Registers the system contract set, updating `contracts` in place if the
    /// ledger moved to a different active contract.
    async fn configure_contract(&self, contracts: &mut SystemContracts) -> Result<(), PluginError>;

    /// Submits a network action signed by `signing_key`.
    async fn submit_network_action(
        &self,
        signing_key: &str,
        action: NetworkActionType,
    ) -> Result<(), PluginError>;
}
