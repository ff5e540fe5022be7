//! New-event notification queue and its background listener.

use std::sync::Arc;

use async_trait::async_trait;
use loom_plugins::{Component, Metrics, PluginError, ShutdownController, ShutdownSignal};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Fan-out capacity for downstream subscribers; slow subscribers lag rather
/// than block the listener.
const DOWNSTREAM_CAPACITY: usize = 256;

pub trait EventManager: Component {
    /// A handle any caller can use to publish new-event notifications.
    fn new_events(&self) -> EventNotifier;

    /// Receives every notification the listener drains.
    fn subscribe(&self) -> broadcast::Receiver<Uuid>;
}

/// Non-blocking publisher onto the event queue.
#[derive(Clone)]
pub struct EventNotifier {
    tx: mpsc::Sender<Uuid>,
    metrics: Arc<Metrics>,
}

impl EventNotifier {
    pub fn new(tx: mpsc::Sender<Uuid>, metrics: Arc<Metrics>) -> Self {
        Self { tx, metrics }
    }

    /// Queues a notification without waiting. When the queue is full the
    /// notification is dropped and `false` is returned.
    pub fn notify(&self, event: Uuid) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => {
                self.metrics.events_notified.inc();
                true
            }
            Err(TrySendError::Full(_)) => {
                self.metrics.events_dropped.inc();
                tracing::warn!(%event, "event queue full, notification dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(%event, "event listener gone, notification discarded");
                false
            }
        }
    }
}

/// Default [`EventManager`]: a bounded queue drained by a single listener
/// task that runs until the process shutdown signal fires.
pub struct ChannelEventManager {
    shutdown: ShutdownController,
    metrics: Arc<Metrics>,
    tx: mpsc::Sender<Uuid>,
    rx: Mutex<Option<mpsc::Receiver<Uuid>>>,
    downstream: broadcast::Sender<Uuid>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl ChannelEventManager {
    pub fn new(shutdown: ShutdownController, metrics: Arc<Metrics>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (downstream, _) = broadcast::channel(DOWNSTREAM_CAPACITY);
        Self {
            shutdown,
            metrics,
            tx,
            rx: Mutex::new(Some(rx)),
            downstream,
            listener: Mutex::new(None),
        }
    }
}

async fn listen(
    mut signal: ShutdownSignal,
    mut rx: mpsc::Receiver<Uuid>,
    downstream: broadcast::Sender<Uuid>,
) {
    tracing::debug!("event listener started");
    loop {
        tokio::select! {
            _ = signal.cancelled() => break,
            received = rx.recv() => match received {
                Some(event) => {
                    tracing::trace!(%event, "new event");
                    // No subscribers is fine: delivery is fire-and-forget.
                    let _ = downstream.send(event);
                }
                None => break,
            },
        }
    }
    tracing::debug!("event listener exited");
}

#[async_trait]
impl Component for ChannelEventManager {
    fn name(&self) -> &'static str {
        "events"
    }

    async fn start(&self) -> Result<(), PluginError> {
        let rx = self
            .rx
            .lock()
            .await
            .take()
            .ok_or_else(|| PluginError::failed("event manager already started"))?;
        let handle = tokio::spawn(listen(
            self.shutdown.subscribe(),
            rx,
            self.downstream.clone(),
        ));
        *self.listener.lock().await = Some(handle);
        Ok(())
    }

    async fn wait_stop(&self) {
        let handle = self.listener.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "event listener terminated abnormally");
            }
        }
    }
}

impl EventManager for ChannelEventManager {
    fn new_events(&self) -> EventNotifier {
        EventNotifier::new(self.tx.clone(), Arc::clone(&self.metrics))
    }

    fn subscribe(&self) -> broadcast::Receiver<Uuid> {
        self.downstream.subscribe()
    }
}
