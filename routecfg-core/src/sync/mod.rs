//! Remote model discovery.
//!
//! This module provides:
//! - `ModelLister` - Transport seam for listing a provider's models
//! - `HttpModelLister` - `GET {baseUrl}/v1/models` over reqwest
//! - `RemoteModelSync` - Additive merge of remote listings into the document

mod client;
mod remote;

pub use client::{HttpModelLister, ModelLister, TransportError, DEFAULT_TIMEOUT};
pub use remote::{RemoteModelSync, SyncOutcome, SyncReport};
