//! Provider and model registry.
//!
//! This module provides:
//! - `ProviderModelRegistry` - Add/delete providers and models with router cascades
//! - `ModelRef` - `provider,model` or bare `model` references with auto-detection

mod registry;
mod types;

pub use registry::{providers_offering, resolve_provider_for_model, ProviderModelRegistry};
pub use types::ModelRef;
