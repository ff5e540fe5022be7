//! Event manager.
//!
//! Components publish "new event" notifications through an [`EventNotifier`];
//! a single background listener drains them until process shutdown and fans
//! them out to downstream subscribers.

pub mod manager;

pub use manager::{ChannelEventManager, EventManager, EventNotifier};
