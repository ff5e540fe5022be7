//! Process-wide cancellation.
//!
//! One [`ShutdownController`] governs the whole process. Long-running tasks
//! take a [`ShutdownSignal`] from [`ShutdownController::subscribe`] and
//! `select!` on [`ShutdownSignal::cancelled`] alongside their main loop.
//! Shutdown is latched: a signal subscribed after shutdown was requested
//! resolves immediately.

use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;

#[derive(Clone, Debug)]
pub struct ShutdownController {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Request shutdown. Idempotent.
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.tx.borrow()
    }

    /// Entry point for a node binary's main task: waits for SIGTERM or
    /// SIGINT, then triggers shutdown. Returns early if shutdown is requested
    /// programmatically in the meantime.
    pub async fn wait_for_signal(&self) {
        let mut requested = self.subscribe();
        let ctrl_c = signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => { tracing::info!("received SIGINT, shutting down"); }
            _ = terminate => { tracing::info!("received SIGTERM, shutting down"); }
            _ = requested.cancelled() => { tracing::debug!("shutdown requested"); }
        }

        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half of a [`ShutdownController`].
#[derive(Clone, Debug)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolves once shutdown has been requested.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                // Controller dropped: nobody is left to cancel us, treat as shutdown.
                return;
            }
        }
    }
}
