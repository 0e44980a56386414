//! The configuration aggregate and its invariant checks.

use std::collections::{BTreeMap, HashSet};
use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::types::{Model, Provider, RouterAssignment, RouterRole};
use crate::error::{ConfigError, Result};

/// Parsed routing configuration: providers keyed by id plus router bindings.
///
/// Readers get plain accessors. Writers inside this crate go through
/// [`ConfigDocument::apply`], which runs the edit on a copy, validates the
/// copy and only then swaps it in, so a failed edit never leaves a partial
/// mutation behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub(crate) providers: BTreeMap<String, Provider>,
    #[serde(default)]
    pub(crate) router: BTreeMap<RouterRole, RouterAssignment>,
    /// Top-level keys this tool does not manage (log settings, host, ...).
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl ConfigDocument {
    /// Build a minimal valid document: one provider whose `model` backs the
    /// `default` router.
    pub fn with_default(
        provider_id: impl Into<String>,
        mut provider: Provider,
        model_id: impl Into<String>,
    ) -> Result<Self> {
        let provider_id = provider_id.into();
        let model_id = model_id.into();
        if !provider.has_model(&model_id) {
            provider.models.push(model_id.clone());
        }

        let mut doc = Self {
            providers: BTreeMap::from([(provider_id.clone(), provider)]),
            router: BTreeMap::new(),
            extra: Map::new(),
        };
        doc.router.insert(
            RouterRole::Default,
            RouterAssignment::new(provider_id, model_id),
        );
        doc.validate()?;
        Ok(doc)
    }

    /// Parse a JSON document and check it against every invariant.
    pub fn parse(json: &str) -> Result<Self> {
        let doc: Self = serde_json::from_str(json)?;
        doc.validate()?;
        debug!(
            providers = doc.providers.len(),
            routers = doc.router.len(),
            "Parsed config document"
        );
        Ok(doc)
    }

    /// Validate and serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        self.validate()?;
        Ok(serde_json::to_string_pretty(self)?)
    }

    // =========================================================================
    // Read Accessors
    // =========================================================================

    /// All providers, sorted by id.
    pub fn providers(&self) -> impl Iterator<Item = (&str, &Provider)> {
        self.providers.iter().map(|(id, p)| (id.as_str(), p))
    }

    /// Number of providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Get a provider by id.
    pub fn provider(&self, id: &str) -> Result<&Provider> {
        self.providers
            .get(id)
            .ok_or_else(|| ConfigError::ProviderNotFound(id.to_string()))
    }

    /// Get a model owned by the given provider.
    pub fn model<'a>(&'a self, provider_id: &str, model_id: &str) -> Result<Model<'a>> {
        let (pid, provider) = self
            .providers
            .get_key_value(provider_id)
            .ok_or_else(|| ConfigError::ProviderNotFound(provider_id.to_string()))?;
        let id = provider
            .models
            .iter()
            .find(|m| *m == model_id)
            .ok_or_else(|| ConfigError::ModelNotFound {
                provider: provider_id.to_string(),
                model: model_id.to_string(),
            })?;
        Ok(Model {
            provider_id: pid,
            id,
        })
    }

    /// Current binding of a role, `None` when unset.
    pub fn router(&self, role: RouterRole) -> Option<&RouterAssignment> {
        self.router.get(&role)
    }

    /// All bound roles in canonical order.
    pub fn routers(&self) -> impl Iterator<Item = (RouterRole, &RouterAssignment)> {
        self.router.iter().map(|(role, a)| (*role, a))
    }

    /// The long-context threshold, if one is configured.
    pub fn long_context_threshold(&self) -> Option<NonZeroU64> {
        self.router
            .get(&RouterRole::LongContext)
            .and_then(|a| a.threshold)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check every invariant, reporting the first violation found.
    ///
    /// Checked in order: router targets exist, `default` is bound, thresholds
    /// only live on `longContext`, and ids are unique and non-empty.
    pub fn validate(&self) -> Result<()> {
        for (role, assignment) in &self.router {
            let Some(provider) = self.providers.get(&assignment.provider_id) else {
                return Err(ConfigError::InvalidConfig(format!(
                    "{} router points at unknown provider '{}'",
                    role, assignment.provider_id
                )));
            };
            if !provider.has_model(&assignment.model_id) {
                return Err(ConfigError::InvalidConfig(format!(
                    "{} router points at model '{}' which provider '{}' does not offer",
                    role, assignment.model_id, assignment.provider_id
                )));
            }
        }

        if !self.router.contains_key(&RouterRole::Default) {
            return Err(ConfigError::InvalidConfig(
                "default router is not set".to_string(),
            ));
        }

        for (role, assignment) in &self.router {
            if assignment.threshold.is_some() && *role != RouterRole::LongContext {
                return Err(ConfigError::InvalidConfig(format!(
                    "threshold is only allowed on the longContext router, found on {}",
                    role
                )));
            }
        }

        for (id, provider) in &self.providers {
            if id.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "provider id must not be empty".to_string(),
                ));
            }
            let mut seen = HashSet::with_capacity(provider.models.len());
            for model in &provider.models {
                if model.trim().is_empty() {
                    return Err(ConfigError::InvalidConfig(format!(
                        "provider '{}' lists an empty model id",
                        id
                    )));
                }
                if !seen.insert(model.as_str()) {
                    return Err(ConfigError::InvalidConfig(format!(
                        "provider '{}' lists model '{}' more than once",
                        id, model
                    )));
                }
            }
        }

        Ok(())
    }

    // =========================================================================
    // Transactional Edits
    // =========================================================================

    /// Run an edit against a copy of this document and commit it only if the
    /// edit succeeds and the result still validates.
    ///
    /// A validation failure is reported as [`ConfigError::InvariantViolation`].
    pub(crate) fn apply<T>(&mut self, edit: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let mut draft = self.clone();
        let out = edit(&mut draft)?;
        draft.validate().map_err(|e| match e {
            ConfigError::InvalidConfig(msg) => ConfigError::InvariantViolation(msg),
            other => other,
        })?;
        *self = draft;
        Ok(out)
    }
}
