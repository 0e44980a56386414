//! Configuration document for routecfg.
//!
//! This module provides:
//! - `ConfigDocument` - Typed providers/routers aggregate with invariant checks
//! - `ConfigStore` - JSON file persistence
//! - `RouterRole`, `Provider`, `RouterAssignment` - Document entities

mod document;
mod store;
mod types;

pub use document::ConfigDocument;
pub use store::{ConfigStore, CONFIG_ENV_VAR};
pub use types::{Model, Provider, RouterAssignment, RouterRole};
