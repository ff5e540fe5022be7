//! Pre-built [`tracing::Span`] constructors for common node operations.
//!
//! Using consistent span names and field sets across the codebase makes it
//! easy to filter, search, and correlate traces.

use tracing::{info_span, Span};

/// Span covering plugin and component initialization.
pub fn init_span(namespace: &str) -> Span {
    info_span!("init", namespace = %namespace)
}

/// Span covering the start sequence.
pub fn start_span(namespace: &str) -> Span {
    info_span!("start", namespace = %namespace)
}

/// Span covering one definition broadcast.
pub fn definition_span(namespace: &str, topic: &str) -> Span {
    info_span!("broadcast_definition", namespace = %namespace, topic = %topic)
}

/// Span covering submission of a network action.
pub fn network_action_span(namespace: &str, action: &str) -> Span {
    info_span!("network_action", namespace = %namespace, action = %action)
}
