//! A fully wired node over nullables, shared by the unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use loom_nullables::{
    CallLog, NullBlockchain, NullDataExchange, NullDatabase, NullIdentityManager, NullManager,
    NullSharedStorage, NullTokens,
};
use loom_plugins::{Metrics, PluginConfig, ShutdownController, TokensPlugin};

use crate::{Components, NodeConfig, Orchestrator, Plugins, TokenPluginConfig};

const MANAGERS: [&str; 11] = [
    "batch",
    "events",
    "broadcast",
    "networkmap",
    "operations",
    "assets",
    "contracts",
    "definitions",
    "batchpin",
    "shareddownload",
    "messaging",
];

pub(crate) struct TestNode {
    pub log: CallLog,
    pub database: Arc<NullDatabase>,
    pub blockchain: Arc<NullBlockchain>,
    pub dataexchange: Arc<NullDataExchange>,
    pub sharedstorage: Arc<NullSharedStorage>,
    pub tokens: Arc<NullTokens>,
    pub identity: Arc<NullIdentityManager>,
    managers: HashMap<&'static str, Arc<NullManager>>,
}

impl TestNode {
    pub fn new() -> Self {
        let log = CallLog::new();
        let managers = MANAGERS
            .into_iter()
            .map(|name| (name, Arc::new(NullManager::with_log(name, log.clone()))))
            .collect();
        Self {
            database: Arc::new(NullDatabase::with_log(log.clone())),
            blockchain: Arc::new(NullBlockchain::with_log(log.clone())),
            dataexchange: Arc::new(NullDataExchange::with_log(log.clone())),
            sharedstorage: Arc::new(NullSharedStorage::with_log(log.clone())),
            tokens: Arc::new(NullTokens::with_log(log.clone())),
            identity: Arc::new(NullIdentityManager::with_log("0x12345", log.clone())),
            managers,
            log,
        }
    }

    pub fn manager(&self, name: &str) -> Arc<NullManager> {
        Arc::clone(&self.managers[name])
    }

    pub fn config(&self) -> NodeConfig {
        NodeConfig {
            namespace: "ns1".into(),
            namespace_description: "test namespace".into(),
            node_identity: "did:loom:node/node1".into(),
            tokens: vec![TokenPluginConfig {
                name: "t1".into(),
                plugin: PluginConfig::new("fftokens"),
            }],
            ..NodeConfig::default()
        }
    }

    pub fn plugins(&self) -> Plugins {
        let tokens: Arc<dyn TokensPlugin> = self.tokens.clone();
        Plugins {
            database: Some(self.database.clone()),
            blockchain: Some(self.blockchain.clone()),
            dataexchange: Some(self.dataexchange.clone()),
            sharedstorage: Some(self.sharedstorage.clone()),
            tokens: vec![("t1".to_string(), tokens)],
        }
    }

    pub fn components(&self) -> Components {
        Components {
            batch: Some(self.manager("batch")),
            broadcast: Some(self.manager("broadcast")),
            events: Some(self.manager("events")),
            networkmap: Some(self.manager("networkmap")),
            operations: Some(self.manager("operations")),
            data: None,
            identity: Some(self.identity.clone()),
            assets: Some(self.manager("assets")),
            contracts: Some(self.manager("contracts")),
            definitions: Some(self.manager("definitions")),
            batchpin: Some(self.manager("batchpin")),
            shareddownload: Some(self.manager("shareddownload")),
            messaging: Some(self.manager("messaging")),
        }
    }

    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(
            self.config(),
            self.plugins(),
            self.components(),
            Arc::new(Metrics::new()),
        )
    }

    /// An orchestrator that has completed `init`.
    pub async fn initialized(&self) -> Orchestrator {
        let mut or = self.orchestrator();
        or.init(ShutdownController::new())
            .await
            .expect("init over nullables");
        or
    }
}
