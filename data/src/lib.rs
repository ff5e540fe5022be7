//! Data integrity engine.
//!
//! Resolves and caches one validator per `(namespace, datatype, version)`,
//! checks values against datatype schemas, and verifies the content hash that
//! seals every data record before the record is trusted.

pub mod error;
pub mod manager;
pub mod validator;

pub use error::DataError;
pub use manager::{DataEngine, DataManager};
pub use validator::{JsonValidator, PassthroughValidator, Validator};
