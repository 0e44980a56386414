//! Registry for adding and removing providers and their models.

use tracing::{debug, info};

use crate::config::{ConfigDocument, Provider, RouterAssignment, RouterRole};
use crate::error::{ConfigError, Result};

/// Ids of every provider offering a model with the given id, sorted.
pub fn providers_offering(doc: &ConfigDocument, model_id: &str) -> Vec<String> {
    doc.providers()
        .filter(|(_, provider)| provider.has_model(model_id))
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Find the single provider offering `model_id`.
///
/// Fails with [`ConfigError::UnknownModel`] when no provider offers it and
/// with [`ConfigError::AmbiguousModel`] when several do.
pub fn resolve_provider_for_model(doc: &ConfigDocument, model_id: &str) -> Result<String> {
    let mut matches = providers_offering(doc, model_id);
    match matches.len() {
        0 => Err(ConfigError::UnknownModel(model_id.to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(ConfigError::AmbiguousModel {
            model: model_id.to_string(),
            providers: matches,
        }),
    }
}

/// Provider and model edits over a loaded document.
///
/// Deletes cascade into the router table. A delete that would leave the
/// `default` router dangling is refused and the document is left as it was.
pub struct ProviderModelRegistry<'a> {
    doc: &'a mut ConfigDocument,
}

impl<'a> ProviderModelRegistry<'a> {
    /// Create a registry over a loaded document.
    pub fn new(doc: &'a mut ConfigDocument) -> Self {
        Self { doc }
    }

    /// Add a provider with no models.
    pub fn add_provider(&mut self, id: &str, base_url: &str, api_key: &str) -> Result<()> {
        if self.doc.providers.contains_key(id) {
            return Err(ConfigError::DuplicateProvider(id.to_string()));
        }

        self.doc.apply(|doc| {
            doc.providers
                .insert(id.to_string(), Provider::new(base_url, api_key));
            Ok(())
        })?;

        info!(provider = %id, base_url = %base_url, "Added provider");
        Ok(())
    }

    /// Add a model to an existing provider.
    ///
    /// The same model id may live under several providers; it only has to
    /// be unique within one.
    pub fn add_model(&mut self, provider_id: &str, model_id: &str) -> Result<()> {
        if self.doc.provider(provider_id)?.has_model(model_id) {
            return Err(ConfigError::DuplicateModel {
                provider: provider_id.to_string(),
                model: model_id.to_string(),
            });
        }

        self.doc.apply(|doc| {
            if let Some(provider) = doc.providers.get_mut(provider_id) {
                provider.models.push(model_id.to_string());
            }
            Ok(())
        })?;

        info!(provider = %provider_id, model = %model_id, "Added model");
        Ok(())
    }

    /// Remove a provider, its models, and every router bound to them.
    ///
    /// Returns the removed provider.
    pub fn delete_provider(&mut self, id: &str) -> Result<Provider> {
        self.doc.provider(id)?;
        if let Some(default) = self.doc.router(RouterRole::Default) {
            if default.provider_id == id {
                return Err(ConfigError::InvariantViolation(format!(
                    "provider '{}' backs the default router ({}); point default elsewhere first",
                    id, default
                )));
            }
        }

        let (removed, cleared) = self.doc.apply(|doc| {
            let removed = doc
                .providers
                .remove(id)
                .ok_or_else(|| ConfigError::ProviderNotFound(id.to_string()))?;
            let cleared = clear_routers(doc, |a| a.provider_id == id);
            Ok((removed, cleared))
        })?;

        info!(
            provider = %id,
            models = removed.models.len(),
            cleared_routers = ?cleared,
            "Deleted provider"
        );
        Ok(removed)
    }

    /// Remove a model from its provider and clear routers bound to it.
    ///
    /// Returns the roles that were cleared.
    pub fn delete_model(&mut self, provider_id: &str, model_id: &str) -> Result<Vec<RouterRole>> {
        self.doc.model(provider_id, model_id)?;
        if let Some(default) = self.doc.router(RouterRole::Default) {
            if default.targets(provider_id, model_id) {
                return Err(ConfigError::InvariantViolation(format!(
                    "model '{}' backs the default router; point default elsewhere first",
                    default
                )));
            }
        }

        let cleared = self.doc.apply(|doc| {
            if let Some(provider) = doc.providers.get_mut(provider_id) {
                provider.models.retain(|m| m != model_id);
            }
            Ok(clear_routers(doc, |a| a.targets(provider_id, model_id)))
        })?;

        info!(
            provider = %provider_id,
            model = %model_id,
            cleared_routers = ?cleared,
            "Deleted model"
        );
        Ok(cleared)
    }

    /// Find the single provider offering `model_id`.
    pub fn resolve_provider_for_model(&self, model_id: &str) -> Result<String> {
        resolve_provider_for_model(&*self.doc, model_id)
    }

    /// Ids of every provider offering `model_id`.
    pub fn providers_offering(&self, model_id: &str) -> Vec<String> {
        providers_offering(&*self.doc, model_id)
    }

    /// Add every id in `model_ids` the provider does not already offer.
    ///
    /// Existing models are never removed. Empty and repeated ids are
    /// skipped. Returns the ids that were added, in input order.
    pub fn merge_models(&mut self, provider_id: &str, model_ids: &[String]) -> Result<Vec<String>> {
        let known = &self.doc.provider(provider_id)?.models;
        let mut added: Vec<String> = Vec::new();
        for id in model_ids {
            let id = id.trim();
            if id.is_empty() || known.iter().any(|m| m == id) || added.iter().any(|m| m == id) {
                continue;
            }
            added.push(id.to_string());
        }

        if added.is_empty() {
            debug!(provider = %provider_id, "No new models to merge");
            return Ok(added);
        }

        self.doc.apply(|doc| {
            if let Some(provider) = doc.providers.get_mut(provider_id) {
                provider.models.extend(added.iter().cloned());
            }
            Ok(())
        })?;

        info!(provider = %provider_id, added = added.len(), "Merged models");
        Ok(added)
    }
}

/// Remove every router binding matching `pred`, returning the cleared roles.
fn clear_routers(
    doc: &mut ConfigDocument,
    pred: impl Fn(&RouterAssignment) -> bool,
) -> Vec<RouterRole> {
    let cleared: Vec<RouterRole> = doc
        .router
        .iter()
        .filter(|(_, a)| pred(a))
        .map(|(role, _)| *role)
        .collect();
    for role in &cleared {
        doc.router.remove(role);
    }
    cleared
}
