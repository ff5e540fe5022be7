//! The node core: owns every plugin and manager and drives them through
//! `Created → Initialized → Started → Stopping → Stopped`.

use std::fmt;
use std::sync::Arc;

use loom_data::{DataEngine, DataManager};
use loom_events::{ChannelEventManager, EventManager};
use loom_plugins::{
    AssetManager, BatchManager, BatchPinSubmitter, BlockchainPlugin, BroadcastManager, Component,
    ContractManager, DataExchangePlugin, Database, DefinitionHandler, IdentityManager,
    KeyNormalization, Metrics, NetworkMap, OperationsManager, PluginConfig, PrivateMessaging,
    SharedDownloadManager, SharedStoragePlugin, ShutdownController, TokensPlugin,
};
use loom_types::{IdentityType, Namespace, NetworkAction, NetworkActionType, SYSTEM_NAMESPACE};
use tracing::Instrument;

use crate::tracing_spans::{init_span, network_action_span, start_span};
use crate::{NodeConfig, OrchestratorError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Initialized,
    Started,
    Stopping,
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Initialized => "initialized",
            Self::Started => "started",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        })
    }
}

/// The capability plugins, one explicit slot each.
#[derive(Clone, Default)]
pub struct Plugins {
    pub database: Option<Arc<dyn Database>>,
    pub blockchain: Option<Arc<dyn BlockchainPlugin>>,
    pub dataexchange: Option<Arc<dyn DataExchangePlugin>>,
    pub sharedstorage: Option<Arc<dyn SharedStoragePlugin>>,
    /// Token connectors by configured name, initialized and started in order.
    pub tokens: Vec<(String, Arc<dyn TokensPlugin>)>,
}

/// The managers composed by the orchestrator.
///
/// `data` and `events` are built by `init` when left empty; every other slot
/// must be filled by the caller.
#[derive(Clone, Default)]
pub struct Components {
    pub batch: Option<Arc<dyn BatchManager>>,
    pub broadcast: Option<Arc<dyn BroadcastManager>>,
    pub events: Option<Arc<dyn EventManager>>,
    pub networkmap: Option<Arc<dyn NetworkMap>>,
    pub operations: Option<Arc<dyn OperationsManager>>,
    pub data: Option<Arc<dyn DataManager>>,
    pub identity: Option<Arc<dyn IdentityManager>>,
    pub assets: Option<Arc<dyn AssetManager>>,
    pub contracts: Option<Arc<dyn ContractManager>>,
    pub definitions: Option<Arc<dyn DefinitionHandler>>,
    pub batchpin: Option<Arc<dyn BatchPinSubmitter>>,
    pub shareddownload: Option<Arc<dyn SharedDownloadManager>>,
    pub messaging: Option<Arc<dyn PrivateMessaging>>,
}

impl Components {
    /// Names of the unfilled slots, in dependency-check order.
    fn missing(&self) -> Vec<&'static str> {
        [
            ("batch", self.batch.is_some()),
            ("broadcast", self.broadcast.is_some()),
            ("events", self.events.is_some()),
            ("networkmap", self.networkmap.is_some()),
            ("operations", self.operations.is_some()),
            ("data", self.data.is_some()),
            ("identity", self.identity.is_some()),
            ("assets", self.assets.is_some()),
            ("contracts", self.contracts.is_some()),
            ("definitions", self.definitions.is_some()),
            ("batchpin", self.batchpin.is_some()),
            ("shareddownload", self.shareddownload.is_some()),
            ("messaging", self.messaging.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Logs each present manager in `$c`.
macro_rules! log_present {
    ($c:expr, $($slot:ident),*) => {
        $(if let Some(m) = &$c.$slot {
            tracing::debug!(component = m.name(), "component initialized");
        })*
    };
}

/// Waits on each present manager in `$c`, in order.
macro_rules! await_stopped {
    ($c:expr, $($slot:ident),*) => {
        $(if let Some(m) = &$c.$slot {
            m.wait_stop().await;
            tracing::debug!(component = m.name(), "component stopped");
        })*
    };
}

pub(crate) fn required<T: ?Sized>(
    slot: &Option<Arc<T>>,
    name: &'static str,
) -> Result<Arc<T>, OrchestratorError> {
    slot.clone().ok_or_else(|| OrchestratorError::missing(name))
}

pub struct Orchestrator {
    pub(crate) config: NodeConfig,
    pub(crate) plugins: Plugins,
    pub(crate) components: Components,
    pub(crate) metrics: Arc<Metrics>,
    state: LifecycleState,
    namespace: Option<Namespace>,
}

impl Orchestrator {
    pub fn new(
        config: NodeConfig,
        plugins: Plugins,
        components: Components,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            config,
            plugins,
            components,
            metrics,
            state: LifecycleState::Created,
            namespace: None,
        }
    }

    /// Initializes every plugin in dependency order, then checks that every
    /// manager is present. `shutdown` is the process cancellation handle
    /// handed to the event manager.
    pub async fn init(&mut self, shutdown: ShutdownController) -> Result<(), OrchestratorError> {
        self.expect_state("init", LifecycleState::Created)?;
        let span = init_span(&self.config.namespace);
        async {
            self.init_plugins().await?;
            self.init_components(shutdown)
        }
        .instrument(span)
        .await?;
        self.state = LifecycleState::Initialized;
        tracing::info!("orchestrator initialized");
        Ok(())
    }

    async fn init_plugins(&self) -> Result<(), OrchestratorError> {
        let database = required(&self.plugins.database, "database")?;
        database.init(&self.config.database).await?;

        let blockchain = required(&self.plugins.blockchain, "blockchain")?;
        blockchain
            .init(&self.config.blockchain, Arc::clone(&self.metrics))
            .await?;

        let nodes = database
            .get_identities(&self.config.namespace, IdentityType::Node)
            .await?;
        let dataexchange = required(&self.plugins.dataexchange, "dataexchange")?;
        dataexchange.init(&self.config.dataexchange, &nodes).await?;

        let sharedstorage = required(&self.plugins.sharedstorage, "sharedstorage")?;
        sharedstorage.init(&self.config.sharedstorage).await?;

        let default_config = PluginConfig::default();
        for (name, plugin) in &self.plugins.tokens {
            let config = self
                .config
                .tokens
                .iter()
                .find(|t| &t.name == name)
                .map(|t| &t.plugin)
                .unwrap_or(&default_config);
            plugin.init(name, config).await?;
        }

        tracing::debug!(
            database = database.name(),
            blockchain = blockchain.name(),
            dataexchange = dataexchange.name(),
            sharedstorage = sharedstorage.name(),
            tokens = self.plugins.tokens.len(),
            "plugins initialized"
        );
        Ok(())
    }

    fn init_components(&mut self, shutdown: ShutdownController) -> Result<(), OrchestratorError> {
        if self.components.data.is_none() {
            if let Some(database) = &self.plugins.database {
                let data: Arc<dyn DataManager> =
                    Arc::new(DataEngine::new(Arc::clone(database), Arc::clone(&self.metrics)));
                self.components.data = Some(data);
            }
        }
        if self.components.events.is_none() {
            let events: Arc<dyn EventManager> = Arc::new(ChannelEventManager::new(
                shutdown,
                Arc::clone(&self.metrics),
                self.config.event_queue_capacity,
            ));
            self.components.events = Some(events);
        }

        let missing = self.components.missing();
        if !missing.is_empty() {
            tracing::error!(?missing, "required components not configured");
            return Err(OrchestratorError::MissingDependency {
                components: missing,
            });
        }
        let c = &self.components;
        log_present!(
            c, batch, broadcast, events, networkmap, operations, data, identity, assets,
            contracts, definitions, batchpin, shareddownload, messaging
        );
        Ok(())
    }

    /// Ensures the namespace exists, configures the system contracts, then
    /// starts plugins and managers in order. Stops at the first failure;
    /// anything already started keeps running and the state stays
    /// `Initialized`.
    pub async fn start(&mut self) -> Result<(), OrchestratorError> {
        self.expect_state("start", LifecycleState::Initialized)?;
        let span = start_span(&self.config.namespace);
        let namespace = self.start_sequence().instrument(span).await?;
        self.namespace = Some(namespace);
        self.state = LifecycleState::Started;
        tracing::info!(namespace = %self.config.namespace, "orchestrator started");
        Ok(())
    }

    async fn start_sequence(&self) -> Result<Namespace, OrchestratorError> {
        let database = required(&self.plugins.database, "database")?;
        let blockchain = required(&self.plugins.blockchain, "blockchain")?;

        let mut namespace = match database.get_namespace(&self.config.namespace).await? {
            Some(existing) => existing,
            None => {
                let created = Namespace::new(
                    self.config.namespace.clone(),
                    self.config.namespace_description.clone(),
                );
                database.upsert_namespace(&created, true).await?;
                tracing::info!(namespace = %created.name, "namespace created");
                created
            }
        };

        let previous = namespace.contracts.clone();
        blockchain.configure_contract(&mut namespace.contracts).await?;
        if namespace.contracts != previous {
            database.upsert_namespace(&namespace, true).await?;
            tracing::info!(
                namespace = %namespace.name,
                index = namespace.contracts.active.index,
                "system contract updated"
            );
        }

        blockchain.start().await?;
        let c = &self.components;
        required(&c.batch, "batch")?.start().await?;
        required(&c.events, "events")?.start().await?;
        required(&c.broadcast, "broadcast")?.start().await?;
        required(&c.messaging, "messaging")?.start().await?;
        for (name, plugin) in &self.plugins.tokens {
            plugin.start().await?;
            tracing::debug!(connector = %name, "token connector started");
        }
        required(&c.shareddownload, "shareddownload")?.start().await?;
        required(&c.operations, "operations")?.start().await?;
        Ok(namespace)
    }

    /// Waits for the batch, broadcast, data, shared-download and operations
    /// managers to stop. Safe from any state; only the first call waits.
    pub async fn wait_stop(&mut self) {
        if matches!(
            self.state,
            LifecycleState::Stopping | LifecycleState::Stopped
        ) {
            return;
        }
        self.state = LifecycleState::Stopping;
        let c = &self.components;
        await_stopped!(c, batch, broadcast, data, shareddownload, operations);
        self.state = LifecycleState::Stopped;
        tracing::info!("orchestrator stopped");
    }

    /// Resolves the node's signing key and submits `action` to the ledger.
    pub async fn submit_network_action(
        &self,
        namespace: &str,
        action: &NetworkAction,
    ) -> Result<(), OrchestratorError> {
        let identity = required(&self.components.identity, "identity")?;
        let blockchain = required(&self.plugins.blockchain, "blockchain")?;
        let span = network_action_span(namespace, &action.action_type);
        async {
            let key = identity
                .normalize_signing_key(namespace, "", KeyNormalization::BlockchainPlugin)
                .await?;
            let action_type = NetworkActionType::parse(&action.action_type).ok_or_else(|| {
                OrchestratorError::UnknownNetworkActionType(action.action_type.clone())
            })?;
            if action_type.system_only() && namespace != SYSTEM_NAMESPACE {
                return Err(OrchestratorError::ActionRestrictedToSystemNamespace {
                    action: action_type.to_string(),
                    namespace: namespace.to_string(),
                });
            }
            blockchain.submit_network_action(&key, action_type).await?;
            self.metrics.network_actions_submitted.inc();
            tracing::info!(key = %key, "network action submitted");
            Ok(())
        }
        .instrument(span)
        .await
    }

    fn expect_state(
        &self,
        operation: &'static str,
        expected: LifecycleState,
    ) -> Result<(), OrchestratorError> {
        if self.state != expected {
            return Err(OrchestratorError::InvalidState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The namespace record, available once started.
    pub fn namespace(&self) -> Option<&Namespace> {
        self.namespace.as_ref()
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn broadcast(&self) -> Option<Arc<dyn BroadcastManager>> {
        self.components.broadcast.clone()
    }

    pub fn private_messaging(&self) -> Option<Arc<dyn PrivateMessaging>> {
        self.components.messaging.clone()
    }

    pub fn events(&self) -> Option<Arc<dyn EventManager>> {
        self.components.events.clone()
    }

    pub fn batch_manager(&self) -> Option<Arc<dyn BatchManager>> {
        self.components.batch.clone()
    }

    pub fn network_map(&self) -> Option<Arc<dyn NetworkMap>> {
        self.components.networkmap.clone()
    }

    pub fn data(&self) -> Option<Arc<dyn DataManager>> {
        self.components.data.clone()
    }

    pub fn assets(&self) -> Option<Arc<dyn AssetManager>> {
        self.components.assets.clone()
    }

    pub fn contracts(&self) -> Option<Arc<dyn ContractManager>> {
        self.components.contracts.clone()
    }

    pub fn operations(&self) -> Option<Arc<dyn OperationsManager>> {
        self.components.operations.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestNode;
    use loom_plugins::PluginError;
    use loom_types::{ContractInfo, Identity};

    fn pop() -> PluginError {
        PluginError::failed("pop")
    }

    #[tokio::test]
    async fn init_ok() {
        let node = TestNode::new();
        node.database.insert_identity(Identity::node("ns1", "node1"));
        node.database.insert_identity(Identity::node("other", "node2"));
        let mut or = node.orchestrator();
        or.init(ShutdownController::new()).await.unwrap();

        assert_eq!(or.state(), LifecycleState::Initialized);
        assert!(or.data().is_some());
        assert!(or.events().is_some());
        assert!(node.blockchain.received_metrics());
        assert_eq!(node.dataexchange.node_count(), 1);
        assert_eq!(node.tokens.connector().as_deref(), Some("t1"));
        assert_eq!(
            node.log.entries(),
            vec![
                "database.init",
                "blockchain.init",
                "database.get_identities",
                "dataexchange.init",
                "sharedstorage.init",
                "tokens.init",
            ]
        );
    }

    #[tokio::test]
    async fn init_twice_is_rejected() {
        let node = TestNode::new();
        let mut or = node.orchestrator();
        or.init(ShutdownController::new()).await.unwrap();
        let err = or.init(ShutdownController::new()).await.unwrap_err();
        assert_eq!(err.code(), "invalid_state");
    }

    #[tokio::test]
    async fn init_database_fails() {
        let node = TestNode::new();
        node.database.fail_on("init", pop());
        let mut or = node.orchestrator();
        let err = or.init(ShutdownController::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "pop");
        assert!(!node.log.contains("blockchain.init"));
        assert_eq!(or.state(), LifecycleState::Created);
    }

    #[tokio::test]
    async fn init_blockchain_fails() {
        let node = TestNode::new();
        node.blockchain.fail_on("init", pop());
        let err = node
            .orchestrator()
            .init(ShutdownController::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "pop");
        assert!(!node.log.contains("database.get_identities"));
    }

    #[tokio::test]
    async fn init_identity_lookup_fails() {
        let node = TestNode::new();
        node.database.fail_on("get_identities", pop());
        let err = node
            .orchestrator()
            .init(ShutdownController::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "pop");
        assert!(!node.log.contains("dataexchange.init"));
    }

    #[tokio::test]
    async fn init_dataexchange_fails() {
        let node = TestNode::new();
        node.dataexchange.fail_on("init", pop());
        let err = node
            .orchestrator()
            .init(ShutdownController::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "pop");
        assert!(!node.log.contains("sharedstorage.init"));
    }

    #[tokio::test]
    async fn init_sharedstorage_fails() {
        let node = TestNode::new();
        node.sharedstorage.fail_on("init", pop());
        let err = node
            .orchestrator()
            .init(ShutdownController::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "pop");
        assert!(!node.log.contains("tokens.init"));
    }

    #[tokio::test]
    async fn init_tokens_fails() {
        let node = TestNode::new();
        node.tokens.fail_on("init", pop());
        let mut or = node.orchestrator();
        let err = or.init(ShutdownController::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "pop");
        assert_eq!(or.state(), LifecycleState::Created);
    }

    #[tokio::test]
    async fn init_builds_event_manager_when_absent() {
        let node = TestNode::new();
        let components = Components {
            events: None,
            ..node.components()
        };
        let mut or = Orchestrator::new(
            node.config(),
            node.plugins(),
            components,
            Arc::new(Metrics::new()),
        );
        or.init(ShutdownController::new()).await.unwrap();
        or.start().await.unwrap();

        assert!(!node.log.contains("events.start"));
        let events = or.events().unwrap();
        assert_eq!(events.name(), "events");
        assert!(events.new_events().notify(uuid::Uuid::new_v4()));
        assert_eq!(or.metrics().events_notified.get(), 1);
    }

    #[tokio::test]
    async fn init_without_database_plugin() {
        let node = TestNode::new();
        let mut plugins = node.plugins();
        plugins.database = None;
        let mut or = Orchestrator::new(
            node.config(),
            plugins,
            node.components(),
            Arc::new(Metrics::new()),
        );
        let err = or.init(ShutdownController::new()).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::MissingDependency { ref components } if components == &["database"]
        ));
        assert!(!node.log.contains("blockchain.init"));
    }

    fn clear(components: &mut Components, name: &str) {
        match name {
            "batch" => components.batch = None,
            "broadcast" => components.broadcast = None,
            "networkmap" => components.networkmap = None,
            "operations" => components.operations = None,
            "identity" => components.identity = None,
            "assets" => components.assets = None,
            "contracts" => components.contracts = None,
            "definitions" => components.definitions = None,
            "batchpin" => components.batchpin = None,
            "shareddownload" => components.shareddownload = None,
            "messaging" => components.messaging = None,
            other => panic!("no slot {other}"),
        }
    }

    #[tokio::test]
    async fn init_components_reports_each_missing_manager() {
        for name in [
            "batch",
            "broadcast",
            "networkmap",
            "operations",
            "identity",
            "assets",
            "contracts",
            "definitions",
            "batchpin",
            "shareddownload",
            "messaging",
        ] {
            let node = TestNode::new();
            let mut components = node.components();
            clear(&mut components, name);
            let mut or = Orchestrator::new(
                node.config(),
                node.plugins(),
                components,
                Arc::new(Metrics::new()),
            );
            match or.init(ShutdownController::new()).await {
                Err(OrchestratorError::MissingDependency { components }) => {
                    assert_eq!(components, vec![name]);
                }
                other => panic!("{name}: expected missing dependency, got {other:?}"),
            }
            assert_eq!(or.state(), LifecycleState::Created);
        }
    }

    #[tokio::test]
    async fn init_components_reports_every_missing_manager_at_once() {
        let node = TestNode::new();
        let mut or = Orchestrator::new(
            node.config(),
            node.plugins(),
            Components::default(),
            Arc::new(Metrics::new()),
        );
        let err = or.init(ShutdownController::new()).await.unwrap_err();
        assert_eq!(err.code(), "missing_dependency");
        assert_eq!(
            err.to_string(),
            "required components not configured: batch, broadcast, networkmap, operations, \
             identity, assets, contracts, definitions, batchpin, shareddownload, messaging"
        );
    }

    #[tokio::test]
    async fn start_before_init_is_rejected() {
        let node = TestNode::new();
        let mut or = node.orchestrator();
        let err = or.start().await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::InvalidState {
                operation: "start",
                state: LifecycleState::Created
            }
        ));
    }

    #[tokio::test]
    async fn start_stop_ok() {
        let node = TestNode::new();
        let shutdown = ShutdownController::new();
        let mut or = node.orchestrator();
        or.init(shutdown.clone()).await.unwrap();
        or.start().await.unwrap();
        assert_eq!(or.state(), LifecycleState::Started);

        let ns = or.namespace().unwrap();
        assert_eq!(ns.name, "ns1");
        assert_eq!(ns.description, "test namespace");
        assert!(node.database.namespace("ns1").is_some());

        let order = [
            "database.get_namespace",
            "database.upsert_namespace",
            "blockchain.configure_contract",
            "blockchain.start",
            "batch.start",
            "events.start",
            "broadcast.start",
            "messaging.start",
            "tokens.start",
            "shareddownload.start",
            "operations.start",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|call| node.log.position(call).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", node.log.entries());

        shutdown.shutdown();
        or.wait_stop().await;
        assert_eq!(or.state(), LifecycleState::Stopped);
        or.wait_stop().await;
        for name in ["batch", "broadcast", "shareddownload", "operations"] {
            assert_eq!(node.manager(name).stop_count(), 1, "{name}");
        }
        assert_eq!(node.manager("messaging").stop_count(), 0);
    }

    #[tokio::test]
    async fn start_uses_existing_namespace() {
        let node = TestNode::new();
        node.database
            .insert_namespace(Namespace::new("ns1", "already here"));
        let mut or = node.initialized().await;
        or.start().await.unwrap();
        assert_eq!(or.namespace().unwrap().description, "already here");
        assert!(!node.log.contains("database.upsert_namespace"));
    }

    #[tokio::test]
    async fn start_persists_contract_change() {
        let node = TestNode::new();
        node.database
            .insert_namespace(Namespace::new("ns1", "already here"));
        node.blockchain.set_active_contract(ContractInfo {
            index: 0,
            location: Some(serde_json::json!({"address": "0x123"})),
            first_event: "oldest".into(),
        });
        let mut or = node.initialized().await;
        or.start().await.unwrap();
        assert_eq!(node.log.count("database.upsert_namespace"), 1);
        let stored = node.database.namespace("ns1").unwrap();
        assert_eq!(stored.contracts.active.first_event, "oldest");
    }

    #[tokio::test]
    async fn start_namespace_lookup_fails() {
        let node = TestNode::new();
        node.database.fail_on("get_namespace", pop());
        let mut or = node.initialized().await;
        let err = or.start().await.unwrap_err();
        assert_eq!(err.to_string(), "pop");
        assert!(!node.log.contains("blockchain.configure_contract"));
        assert_eq!(or.state(), LifecycleState::Initialized);
    }

    #[tokio::test]
    async fn start_namespace_create_fails() {
        let node = TestNode::new();
        node.database.fail_on("upsert_namespace", pop());
        let mut or = node.initialized().await;
        assert_eq!(or.start().await.unwrap_err().to_string(), "pop");
        assert!(!node.log.contains("blockchain.configure_contract"));
    }

    #[tokio::test]
    async fn start_configure_contract_fails() {
        let node = TestNode::new();
        node.blockchain.fail_on("configure_contract", pop());
        let mut or = node.initialized().await;
        assert_eq!(or.start().await.unwrap_err().to_string(), "pop");
        assert!(!node.log.contains("blockchain.start"));
    }

    #[tokio::test]
    async fn start_blockchain_fails() {
        let node = TestNode::new();
        node.blockchain.fail_on("start", pop());
        let mut or = node.initialized().await;
        assert_eq!(or.start().await.unwrap_err().to_string(), "pop");
        assert!(!node.log.contains("batch.start"));
    }

    #[tokio::test]
    async fn start_stops_at_first_failing_manager() {
        let sequence = [
            "batch",
            "events",
            "broadcast",
            "messaging",
            "shareddownload",
            "operations",
        ];
        for (i, failing) in sequence.iter().enumerate() {
            let node = TestNode::new();
            node.manager(failing).fail_on("start", pop());
            let mut or = node.initialized().await;
            let err = or.start().await.unwrap_err();
            assert_eq!(err.to_string(), "pop", "{failing}");
            for later in &sequence[i + 1..] {
                assert!(
                    !node.log.contains(&format!("{later}.start")),
                    "{later} started after {failing} failed"
                );
            }
            for earlier in &sequence[..i] {
                assert!(node.log.contains(&format!("{earlier}.start")));
            }
            assert_eq!(or.state(), LifecycleState::Initialized);
        }
    }

    #[tokio::test]
    async fn start_tokens_fails() {
        let node = TestNode::new();
        node.tokens.fail_on("start", pop());
        let mut or = node.initialized().await;
        assert_eq!(or.start().await.unwrap_err().to_string(), "pop");
        assert!(!node.log.contains("shareddownload.start"));
    }

    #[tokio::test]
    async fn wait_stop_before_start() {
        let node = TestNode::new();
        let mut or = node.orchestrator();
        or.wait_stop().await;
        or.wait_stop().await;
        assert_eq!(or.state(), LifecycleState::Stopped);
        assert_eq!(node.manager("batch").stop_count(), 1);
        assert!(or.init(ShutdownController::new()).await.is_err());
    }

    #[tokio::test]
    async fn accessors_return_held_components() {
        let node = TestNode::new();
        let or = node.orchestrator();
        assert!(or.broadcast().is_some());
        assert!(or.private_messaging().is_some());
        assert!(or.batch_manager().is_some());
        assert!(or.network_map().is_some());
        assert!(or.assets().is_some());
        assert!(or.contracts().is_some());
        assert!(or.operations().is_some());
        assert!(or.data().is_none());
        assert!(or.events().is_some());
        assert!(or.namespace().is_none());
        assert_eq!(or.metrics().network_actions_submitted.get(), 0);
    }

    #[tokio::test]
    async fn network_action_ok() {
        let node = TestNode::new();
        let or = node.orchestrator();
        or.submit_network_action(SYSTEM_NAMESPACE, &NetworkAction::new("terminate"))
            .await
            .unwrap();
        assert_eq!(
            node.blockchain.submitted(),
            vec![("0x12345".to_string(), NetworkActionType::Terminate)]
        );
        assert_eq!(
            node.identity.requests(),
            vec![(
                SYSTEM_NAMESPACE.to_string(),
                String::new(),
                KeyNormalization::BlockchainPlugin
            )]
        );
        assert_eq!(or.metrics().network_actions_submitted.get(), 1);
    }

    #[tokio::test]
    async fn network_action_bad_key() {
        let node = TestNode::new();
        node.identity.fail_on("normalize_signing_key", pop());
        let or = node.orchestrator();
        let err = or
            .submit_network_action(SYSTEM_NAMESPACE, &NetworkAction::new("terminate"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "pop");
        assert!(node.blockchain.submitted().is_empty());
    }

    #[tokio::test]
    async fn network_action_bad_type() {
        let node = TestNode::new();
        let or = node.orchestrator();
        let err = or
            .submit_network_action(SYSTEM_NAMESPACE, &NetworkAction::new("bad"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "unknown_network_action_type");
        assert!(err.to_string().contains("'bad'"));
        assert!(node.blockchain.submitted().is_empty());
    }

    #[tokio::test]
    async fn network_action_non_system_namespace() {
        let node = TestNode::new();
        let or = node.orchestrator();
        let err = or
            .submit_network_action("ns1", &NetworkAction::new("terminate"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "network_action_restricted");
        assert!(node.blockchain.submitted().is_empty());
    }

    #[tokio::test]
    async fn network_action_ledger_error_passes_through() {
        let node = TestNode::new();
        node.blockchain.fail_on("submit_network_action", pop());
        let or = node.orchestrator();
        let err = or
            .submit_network_action(SYSTEM_NAMESPACE, &NetworkAction::new("terminate"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "pop");
        assert_eq!(or.metrics().network_actions_submitted.get(), 0);
    }
}
