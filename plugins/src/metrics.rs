//! Prometheus metrics for the node core.
//!
//! [`Metrics`] owns a dedicated [`Registry`]; the ledger plugin receives a
//! handle at init time and may register its own collectors in it.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

pub struct Metrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Data records that passed validation.
    pub data_validated: IntCounter,
    /// Data records rejected by validation (any reason).
    pub data_validation_failures: IntCounter,
    /// Definition messages handed to the broadcast manager.
    pub definitions_broadcast: IntCounter,
    /// Network actions accepted by the ledger plugin.
    pub network_actions_submitted: IntCounter,
    /// Event notifications accepted onto the event queue.
    pub events_notified: IntCounter,
    /// Event notifications dropped because the queue was full.
    pub events_dropped: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Validators currently held in the validator cache.
    pub validator_cache_size: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let data_validated = register_int_counter_with_registry!(
            Opts::new("loom_data_validated_total", "Data records that passed validation"),
            registry
        )
        .expect("failed to register data_validated counter");

        let data_validation_failures = register_int_counter_with_registry!(
            Opts::new(
                "loom_data_validation_failures_total",
                "Data records rejected by validation"
            ),
            registry
        )
        .expect("failed to register data_validation_failures counter");

        let definitions_broadcast = register_int_counter_with_registry!(
            Opts::new(
                "loom_definitions_broadcast_total",
                "Definition messages submitted for broadcast"
            ),
            registry
        )
        .expect("failed to register definitions_broadcast counter");

        let network_actions_submitted = register_int_counter_with_registry!(
            Opts::new(
                "loom_network_actions_submitted_total",
                "Network actions submitted to the ledger"
            ),
            registry
        )
        .expect("failed to register network_actions_submitted counter");

        let events_notified = register_int_counter_with_registry!(
            Opts::new("loom_events_notified_total", "Event notifications queued"),
            registry
        )
        .expect("failed to register events_notified counter");

        let events_dropped = register_int_counter_with_registry!(
            Opts::new(
                "loom_events_dropped_total",
                "Event notifications dropped on a full queue"
            ),
            registry
        )
        .expect("failed to register events_dropped counter");

        let validator_cache_size = register_int_gauge_with_registry!(
            Opts::new("loom_validator_cache_size", "Validators held in the cache"),
            registry
        )
        .expect("failed to register validator_cache_size gauge");

        Self {
            registry,
            data_validated,
            data_validation_failures,
            definitions_broadcast,
            network_actions_submitted,
            events_notified,
            events_dropped,
            validator_cache_size,
        }
    }

    /// Renders every registered metric in the Prometheus text format.
    pub fn encode_text(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!(error = %e, "failed to encode metrics");
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
