//! Nullable infrastructure for deterministic testing.
//!
//! Every plugin and manager the orchestrator composes has an in-memory
//! stand-in here. They:
//! - Record each call in a [`CallLog`] that can be shared across doubles
//! - Fail on demand with an injected [`loom_plugins::PluginError`]
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod database;
pub mod managers;
pub mod plugins;
pub mod recorder;

pub use database::NullDatabase;
pub use managers::{NullIdentityManager, NullManager};
pub use plugins::{NullBlockchain, NullDataExchange, NullSharedStorage, NullTokens};
pub use recorder::{CallLog, FailurePlan};
