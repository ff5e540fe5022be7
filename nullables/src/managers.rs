//! Nullable managers for orchestration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use loom_events::{EventManager, EventNotifier};
use loom_plugins::{
    AssetManager, BatchManager, BatchPinSubmitter, BroadcastManager, Component, ContractManager,
    DefinitionHandler, IdentityManager, KeyNormalization, Metrics, NetworkMap, OperationsManager,
    PluginError, PrivateMessaging, SharedDownloadManager,
};
use loom_types::Message;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

const EVENT_CAPACITY: usize = 64;

use crate::recorder::{enter, CallLog, FailurePlan};

/// Stands in for any manager the orchestrator composes. Calls are logged
/// as `<name>.<op>`.
pub struct NullManager {
    name: &'static str,
    calls: CallLog,
    failures: FailurePlan,
    stops: AtomicUsize,
    broadcasts: Mutex<Vec<Message>>,
    events_tx: mpsc::Sender<Uuid>,
    events_rx: Mutex<mpsc::Receiver<Uuid>>,
    downstream: broadcast::Sender<Uuid>,
    metrics: Arc<Metrics>,
}

impl NullManager {
    pub fn new(name: &'static str) -> Self {
        Self::with_log(name, CallLog::new())
    }

    pub fn with_log(name: &'static str, calls: CallLog) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CAPACITY);
        let (downstream, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            name,
            calls,
            failures: FailurePlan::default(),
            stops: AtomicUsize::new(0),
            broadcasts: Mutex::new(Vec::new()),
            events_tx,
            events_rx: Mutex::new(events_rx),
            downstream,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn calls(&self) -> &CallLog {
        &self.calls
    }

    pub fn fail_on(&self, operation: &str, error: PluginError) {
        self.failures.fail_on(operation, error);
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Messages handed to `broadcast_message`, in order.
    pub fn broadcasts(&self) -> Vec<Message> {
        self.broadcasts.lock().unwrap().clone()
    }

    /// Drains the notifications queued through `new_events` since the last
    /// call. Nothing is forwarded to subscribers until [`Self::emit`].
    pub fn notified(&self) -> Vec<Uuid> {
        let mut rx = self.events_rx.lock().unwrap();
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    /// Delivers `event` to every current subscriber.
    pub fn emit(&self, event: Uuid) -> usize {
        self.downstream.send(event).unwrap_or(0)
    }
}

#[async_trait]
impl Component for NullManager {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn start(&self) -> Result<(), PluginError> {
        enter(&self.calls, &self.failures, self.name, "start")
    }

    async fn wait_stop(&self) {
        self.calls.record(format!("{}.wait_stop", self.name));
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BroadcastManager for NullManager {
    async fn broadcast_message(&self, message: &mut Message) -> Result<(), PluginError> {
        enter(&self.calls, &self.failures, self.name, "broadcast_message")?;
        self.broadcasts.lock().unwrap().push(message.clone());
        Ok(())
    }
}

impl EventManager for NullManager {
    fn new_events(&self) -> EventNotifier {
        self.calls.record(format!("{}.new_events", self.name));
        EventNotifier::new(self.events_tx.clone(), Arc::clone(&self.metrics))
    }

    fn subscribe(&self) -> broadcast::Receiver<Uuid> {
        self.downstream.subscribe()
    }
}

impl BatchManager for NullManager {}
impl PrivateMessaging for NullManager {}
impl OperationsManager for NullManager {}
impl SharedDownloadManager for NullManager {}
impl NetworkMap for NullManager {}
impl AssetManager for NullManager {}
impl ContractManager for NullManager {}
impl DefinitionHandler for NullManager {}
impl BatchPinSubmitter for NullManager {}

/// Resolves every signing key to a fixed value.
pub struct NullIdentityManager {
    calls: CallLog,
    failures: FailurePlan,
    resolved: String,
    requests: Mutex<Vec<(String, String, KeyNormalization)>>,
}

impl NullIdentityManager {
    pub fn new(resolved: impl Into<String>) -> Self {
        Self::with_log(resolved, CallLog::new())
    }

    pub fn with_log(resolved: impl Into<String>, calls: CallLog) -> Self {
        Self {
            calls,
            failures: FailurePlan::default(),
            resolved: resolved.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_on(&self, operation: &str, error: PluginError) {
        self.failures.fail_on(operation, error);
    }

    /// `(namespace, key, mode)` for every normalization request.
    pub fn requests(&self) -> Vec<(String, String, KeyNormalization)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Component for NullIdentityManager {
    fn name(&self) -> &'static str {
        "identity"
    }
}

#[async_trait]
impl IdentityManager for NullIdentityManager {
    async fn normalize_signing_key(
        &self,
        namespace: &str,
        key: &str,
        mode: KeyNormalization,
    ) -> Result<String, PluginError> {
        self.requests
            .lock()
            .unwrap()
            .push((namespace.to_string(), key.to_string(), mode));
        enter(&self.calls, &self.failures, "identity", "normalize_signing_key")?;
        Ok(self.resolved.clone())
    }
}
