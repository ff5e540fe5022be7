//! Higher-level managers the orchestrator composes but does not implement.
//!
//! Most are only started and awaited here; their working surface lives with
//! their own implementations.

use async_trait::async_trait;
use loom_types::Message;

use crate::{Component, PluginError};

/// Assembles messages into batches for dissemination.
pub trait BatchManager: Component {}

/// Disseminates broadcast messages to every network member.
#[async_trait]
pub trait BroadcastManager: Component {
    /// Queues `message` for broadcast. The manager may seal the message and
    /// assign transaction details in place.
    async fn broadcast_message(&self, message: &mut Message) -> Result<(), PluginError>;
}

/// Sends messages privately to a subset of members.
pub trait PrivateMessaging: Component {}

/// Tracks operations submitted to plugins.
pub trait OperationsManager: Component {}

/// Downloads batches and blobs referenced from shared storage.
pub trait SharedDownloadManager: Component {}

/// Maintains the registry of organizations and nodes.
pub trait NetworkMap: Component {}

/// Token pools, transfers and approvals.
pub trait AssetManager: Component {}

/// Custom smart-contract interfaces and listeners.
pub trait ContractManager: Component {}

/// Applies inbound definition messages to local state.
pub trait DefinitionHandler: Component {}

/// Writes batch pins to the ledger.
pub trait BatchPinSubmitter: Component {}

/// How a signing key should be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyNormalization {
    /// Ask the ledger plugin to resolve the key (falls back to the node default).
    BlockchainPlugin,
    /// Use the key exactly as given.
    None,
}

/// Resolves identities and signing keys.
#[async_trait]
pub trait IdentityManager: Component {
    async fn normalize_signing_key(
        &self,
        namespace: &str,
        key: &str,
        mode: KeyNormalization,
    ) -> Result<String, PluginError>;
}
