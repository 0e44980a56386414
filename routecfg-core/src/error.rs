//! Error type shared by every core operation.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::RouterRole;
use crate::sync::TransportError;

/// Errors that can occur while reading or editing a routing configuration.
///
/// Every operation that returns one of these leaves the document it was
/// called on untouched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),
    #[error("Model '{model}' not found in provider '{provider}'")]
    ModelNotFound { provider: String, model: String },
    #[error("Model '{0}' is not offered by any provider")]
    UnknownModel(String),
    #[error("Unknown router role '{0}' (expected one of: default, background, think, longContext, webSearch)")]
    UnknownRole(String),
    #[error("Config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Provider already exists: {0}")]
    DuplicateProvider(String),
    #[error("Model '{model}' already exists in provider '{provider}'")]
    DuplicateModel { provider: String, model: String },

    #[error(
        "Model '{model}' is offered by several providers ({}); use <provider>,<model>",
        .providers.join(", ")
    )]
    AmbiguousModel {
        model: String,
        providers: Vec<String>,
    },

    #[error("The {0} router cannot be removed")]
    ImmutableRouter(RouterRole),

    #[error("Invalid model reference '{0}' (expected <provider>,<model> or <model>)")]
    InvalidModelRef(String),

    #[error("{0}")]
    Precondition(String),

    #[error("Operation would break the configuration: {0}")]
    InvariantViolation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to sync models for provider '{provider}': {source}")]
    Sync {
        provider: String,
        #[source]
        source: TransportError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// True for the "does not exist" family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProviderNotFound(_)
                | Self::ModelNotFound { .. }
                | Self::UnknownModel(_)
                | Self::UnknownRole(_)
                | Self::FileNotFound(_)
        )
    }

    /// True for id collisions on add.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateProvider(_) | Self::DuplicateModel { .. })
    }
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
