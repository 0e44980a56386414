//! routecfg Core Library
//!
//! This crate provides the core of routecfg, an editor for AI model routing
//! configurations. It includes:
//!
//! - Typed configuration document with invariant checks
//! - JSON file storage
//! - Router role get/set/delete and the long-context threshold
//! - Provider and model registry with bare-name auto-detection
//! - Additive sync of provider model listings over HTTP
//!
//! Every edit is all-or-nothing: it either succeeds and leaves a valid
//! document, or fails and leaves the document exactly as it was.

pub mod config;
pub mod error;
pub mod models;
pub mod router;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use config::{
    ConfigDocument, ConfigStore, Model, Provider, RouterAssignment, RouterRole, CONFIG_ENV_VAR,
};
pub use error::{ConfigError, Result};
pub use models::{ModelRef, ProviderModelRegistry};
pub use router::RouterResolver;
pub use sync::{
    HttpModelLister, ModelLister, RemoteModelSync, SyncOutcome, SyncReport, TransportError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
