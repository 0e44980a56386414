//! Model reference parsing.

use std::str::FromStr;

use crate::config::ConfigDocument;
use crate::error::{ConfigError, Result};

use super::registry::resolve_provider_for_model;

/// A model named either as `provider,model` or as a bare `model`.
///
/// Only the first comma splits, so model ids containing `/` or further
/// commas (`anthropic/claude-3.5-sonnet`) survive intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub provider: Option<String>,
    pub model: String,
}

impl ModelRef {
    /// Reference a model under an explicit provider.
    pub fn qualified(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            model: model.into(),
        }
    }

    /// Reference a model by bare name.
    pub fn bare(model: impl Into<String>) -> Self {
        Self {
            provider: None,
            model: model.into(),
        }
    }

    /// The owning provider id: the explicit one, or the single provider
    /// offering this model.
    pub fn resolve_provider(&self, doc: &ConfigDocument) -> Result<String> {
        match &self.provider {
            Some(provider) => {
                doc.model(provider, &self.model)?;
                Ok(provider.clone())
            }
            None => resolve_provider_for_model(doc, &self.model),
        }
    }
}

impl FromStr for ModelRef {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidModelRef(s.to_string());
        match s.split_once(',') {
            Some((provider, model)) => {
                let (provider, model) = (provider.trim(), model.trim());
                if provider.is_empty() || model.is_empty() {
                    return Err(invalid());
                }
                Ok(Self::qualified(provider, model))
            }
            None => {
                let model = s.trim();
                if model.is_empty() {
                    return Err(invalid());
                }
                Ok(Self::bare(model))
            }
        }
    }
}

impl std::fmt::Display for ModelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.provider {
            Some(provider) => write!(f, "{},{}", provider, self.model),
            None => f.write_str(&self.model),
        }
    }
}
