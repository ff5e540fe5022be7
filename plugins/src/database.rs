//! Local database capability.

use async_trait::async_trait;
use loom_types::{Data, Datatype, Identity, IdentityType, Namespace};

use crate::{Plugin, PluginConfig, PluginError};

/// The storage surface consumed by the node core.
#[async_trait]
pub trait Database: Plugin {
    async fn init(&self, config: &PluginConfig) -> Result<(), PluginError>;

    /// `Ok(None)` when no such datatype has been published.
    async fn get_datatype_by_name(
        &self,
        namespace: &str,
        name: &str,
        version: &str,
    ) -> Result<Option<Datatype>, PluginError>;

    /// Writes a data record. `allow_existing` permits overwriting a record with
    /// the same id; `is_update` tells the backend the id is already known so it
    /// can skip the insert attempt.
    async fn upsert_data(
        &self,
        data: &Data,
        allow_existing: bool,
        is_update: bool,
    ) -> Result<(), PluginError>;

    async fn get_namespace(&self, name: &str) -> Result<Option<Namespace>, PluginError>;

    async fn upsert_namespace(
        &self,
        namespace: &Namespace,
        allow_existing: bool,
    ) -> Result<(), PluginError>;

    async fn get_identities(
        &self,
        namespace: &str,
        identity_type: IdentityType,
    ) -> Result<Vec<Identity>, PluginError>;
}
