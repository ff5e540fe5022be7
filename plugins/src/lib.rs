//! Capability contracts for the loom node's pluggable subsystems.
//!
//! Every plugin (database, ledger, data exchange, shared storage, tokens) and
//! every manager the orchestrator composes is reached through the traits in
//! this crate. Implementations live elsewhere; the core depends only on these.

pub mod blockchain;
pub mod config;
pub mod database;
pub mod dataexchange;
pub mod error;
pub mod lifecycle;
pub mod managers;
pub mod metrics;
pub mod sharedstorage;
pub mod shutdown;
pub mod tokens;

pub use blockchain::BlockchainPlugin;
pub use config::PluginConfig;
pub use database::Database;
pub use dataexchange::DataExchangePlugin;
pub use error::PluginError;
pub use lifecycle::{Component, Plugin};
pub use managers::{
    AssetManager, BatchManager, BatchPinSubmitter, BroadcastManager, ContractManager,
    DefinitionHandler, IdentityManager, KeyNormalization, NetworkMap, OperationsManager,
    PrivateMessaging, SharedDownloadManager,
};
pub use metrics::Metrics;
pub use sharedstorage::SharedStoragePlugin;
pub use shutdown::{ShutdownController, ShutdownSignal};
pub use tokens::TokensPlugin;
