//! Nullable ledger, data exchange, shared storage and token plugins.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use loom_plugins::{
    BlockchainPlugin, DataExchangePlugin, Metrics, Plugin, PluginConfig, PluginError,
    SharedStoragePlugin, TokensPlugin,
};
use loom_types::{ContractInfo, NetworkActionType, SystemContracts};

use crate::recorder::{enter, CallLog, FailurePlan};

/// Shared init/start bookkeeping for the simple plugins.
struct PluginState {
    prefix: &'static str,
    calls: CallLog,
    failures: FailurePlan,
    initialized: AtomicBool,
}

impl PluginState {
    fn new(prefix: &'static str, calls: CallLog) -> Self {
        Self {
            prefix,
            calls,
            failures: FailurePlan::default(),
            initialized: AtomicBool::new(false),
        }
    }

    fn init(&self) -> Result<(), PluginError> {
        enter(&self.calls, &self.failures, self.prefix, "init")?;
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn start(&self) -> Result<(), PluginError> {
        enter(&self.calls, &self.failures, self.prefix, "start")?;
        if !self.initialized.load(Ordering::SeqCst) {
            return Err(PluginError::NotInitialized(self.prefix.to_string()));
        }
        Ok(())
    }
}

/// In-memory ledger. Records submitted network actions and can move the
/// namespace onto a new active contract when configured.
pub struct NullBlockchain {
    state: PluginState,
    metrics_received: AtomicBool,
    next_contract: Mutex<Option<ContractInfo>>,
    submitted: Mutex<Vec<(String, NetworkActionType)>>,
}

impl NullBlockchain {
    pub fn new() -> Self {
        Self::with_log(CallLog::new())
    }

    pub fn with_log(calls: CallLog) -> Self {
        Self {
            state: PluginState::new("blockchain", calls),
            metrics_received: AtomicBool::new(false),
            next_contract: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> &CallLog {
        &self.state.calls
    }

    pub fn fail_on(&self, operation: &str, error: PluginError) {
        self.state.failures.fail_on(operation, error);
    }

    /// The next `configure_contract` call replaces the active contract.
    pub fn set_active_contract(&self, contract: ContractInfo) {
        *self.next_contract.lock().unwrap() = Some(contract);
    }

    pub fn received_metrics(&self) -> bool {
        self.metrics_received.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<(String, NetworkActionType)> {
        self.submitted.lock().unwrap().clone()
    }
}

impl Default for NullBlockchain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for NullBlockchain {
    fn name(&self) -> &str {
        "null"
    }

    async fn start(&self) -> Result<(), PluginError> {
        self.state.start()
    }
}

#[async_trait]
impl BlockchainPlugin for NullBlockchain {
    async fn init(&self, _config: &PluginConfig, _metrics: Arc<Metrics>) -> Result<(), PluginError> {
        self.state.init()?;
        self.metrics_received.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn configure_contract(&self, contracts: &mut SystemContracts) -> Result<(), PluginError> {
        enter(
            &self.state.calls,
            &self.state.failures,
            "blockchain",
            "configure_contract",
        )?;
        if let Some(next) = self.next_contract.lock().unwrap().take() {
            let previous = std::mem::replace(&mut contracts.active, next);
            if previous != ContractInfo::default() {
                contracts.terminated.push(previous);
            }
        }
        Ok(())
    }

    async fn submit_network_action(
        &self,
        signing_key: &str,
        action: NetworkActionType,
    ) -> Result<(), PluginError> {
        enter(
            &self.state.calls,
            &self.state.failures,
            "blockchain",
            "submit_network_action",
        )?;
        self.submitted
            .lock()
            .unwrap()
            .push((signing_key.to_string(), action));
        Ok(())
    }
}

/// In-memory data exchange. Remembers how many peer nodes it was given.
pub struct NullDataExchange {
    state: PluginState,
    nodes: AtomicUsize,
}

impl NullDataExchange {
    pub fn new() -> Self {
        Self::with_log(CallLog::new())
    }

    pub fn with_log(calls: CallLog) -> Self {
        Self {
            state: PluginState::new("dataexchange", calls),
            nodes: AtomicUsize::new(0),
        }
    }

    pub fn fail_on(&self, operation: &str, error: PluginError) {
        self.state.failures.fail_on(operation, error);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.load(Ordering::SeqCst)
    }
}

impl Default for NullDataExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for NullDataExchange {
    fn name(&self) -> &str {
        "null"
    }

    async fn start(&self) -> Result<(), PluginError> {
        self.state.start()
    }
}

#[async_trait]
impl DataExchangePlugin for NullDataExchange {
    async fn init(
        &self,
        _config: &PluginConfig,
        nodes: &[loom_types::Identity],
    ) -> Result<(), PluginError> {
        self.state.init()?;
        self.nodes.store(nodes.len(), Ordering::SeqCst);
        Ok(())
    }
}

pub struct NullSharedStorage {
    state: PluginState,
}

impl NullSharedStorage {
    pub fn new() -> Self {
        Self::with_log(CallLog::new())
    }

    pub fn with_log(calls: CallLog) -> Self {
        Self {
            state: PluginState::new("sharedstorage", calls),
        }
    }

    pub fn fail_on(&self, operation: &str, error: PluginError) {
        self.state.failures.fail_on(operation, error);
    }
}

impl Default for NullSharedStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for NullSharedStorage {
    fn name(&self) -> &str {
        "null"
    }

    async fn start(&self) -> Result<(), PluginError> {
        self.state.start()
    }
}

#[async_trait]
impl SharedStoragePlugin for NullSharedStorage {
    async fn init(&self, _config: &PluginConfig) -> Result<(), PluginError> {
        self.state.init()
    }
}

/// In-memory token connector. Calls are logged as `tokens.<op>`.
pub struct NullTokens {
    state: PluginState,
    connector: Mutex<Option<String>>,
}

impl NullTokens {
    pub fn new() -> Self {
        Self::with_log(CallLog::new())
    }

    pub fn with_log(calls: CallLog) -> Self {
        Self {
            state: PluginState::new("tokens", calls),
            connector: Mutex::new(None),
        }
    }

    pub fn fail_on(&self, operation: &str, error: PluginError) {
        self.state.failures.fail_on(operation, error);
    }

    /// The connector name passed to `init`.
    pub fn connector(&self) -> Option<String> {
        self.connector.lock().unwrap().clone()
    }
}

impl Default for NullTokens {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for NullTokens {
    fn name(&self) -> &str {
        "null"
    }

    async fn start(&self) -> Result<(), PluginError> {
        self.state.start()
    }
}

#[async_trait]
impl TokensPlugin for NullTokens {
    async fn init(&self, name: &str, _config: &PluginConfig) -> Result<(), PluginError> {
        self.state.init()?;
        *self.connector.lock().unwrap() = Some(name.to_string());
        Ok(())
    }
}
