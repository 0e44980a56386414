//! Get/set/delete semantics for router roles.

use std::num::NonZeroU64;

use tracing::{debug, info};

use crate::config::{ConfigDocument, RouterAssignment, RouterRole};
use crate::error::{ConfigError, Result};
use crate::models::ModelRef;

/// Edits the router bindings of a document.
pub struct RouterResolver<'a> {
    doc: &'a mut ConfigDocument,
}

impl<'a> RouterResolver<'a> {
    /// Create a resolver over a loaded document.
    pub fn new(doc: &'a mut ConfigDocument) -> Self {
        Self { doc }
    }

    /// Current binding of a role, `None` when unset.
    pub fn get(&self, role: RouterRole) -> Option<&RouterAssignment> {
        self.doc.router(role)
    }

    /// Bind a role to a model, replacing any previous binding.
    ///
    /// Re-pointing `longContext` keeps its threshold; every other role is
    /// stored without one.
    pub fn set(&mut self, role: RouterRole, provider_id: &str, model_id: &str) -> Result<()> {
        self.doc.model(provider_id, model_id)?;

        let previous = self.doc.apply(|doc| {
            let mut assignment = RouterAssignment::new(provider_id, model_id);
            if role == RouterRole::LongContext {
                assignment.threshold = doc.long_context_threshold();
            }
            Ok(doc.router.insert(role, assignment))
        })?;

        info!(
            role = %role,
            provider = %provider_id,
            model = %model_id,
            previous = ?previous.map(|a| a.to_string()),
            "Router updated"
        );
        Ok(())
    }

    /// Bind a role from a `provider,model` or bare `model` reference.
    ///
    /// Bare names are auto-detected and fail when several providers offer
    /// the same model id.
    pub fn set_from_ref(&mut self, role: RouterRole, model_ref: &ModelRef) -> Result<RouterAssignment> {
        let provider_id = model_ref.resolve_provider(&*self.doc)?;
        self.set(role, &provider_id, &model_ref.model)?;
        Ok(RouterAssignment::new(provider_id, model_ref.model.clone()))
    }

    /// Unbind a role. Unbinding an unset role is a no-op.
    ///
    /// `default` can never be removed; removing `longContext` drops its
    /// threshold with it.
    pub fn delete(&mut self, role: RouterRole) -> Result<Option<RouterAssignment>> {
        if role == RouterRole::Default {
            return Err(ConfigError::ImmutableRouter(role));
        }

        let removed = self.doc.apply(|doc| Ok(doc.router.remove(&role)))?;
        match &removed {
            Some(assignment) => info!(role = %role, was = %assignment, "Router removed"),
            None => debug!(role = %role, "Router already unset"),
        }
        Ok(removed)
    }

    /// Set the token threshold of the `longContext` router.
    pub fn set_long_context_threshold(&mut self, value: u64) -> Result<()> {
        let threshold = NonZeroU64::new(value).ok_or_else(|| {
            ConfigError::Precondition("threshold must be a positive integer".to_string())
        })?;

        self.doc.apply(|doc| {
            let assignment = doc.router.get_mut(&RouterRole::LongContext).ok_or_else(|| {
                ConfigError::Precondition(
                    "longContext router must be set before a threshold can be applied"
                        .to_string(),
                )
            })?;
            assignment.threshold = Some(threshold);
            Ok(())
        })?;

        info!(threshold = value, "Long-context threshold updated");
        Ok(())
    }

    /// The current long-context threshold.
    pub fn long_context_threshold(&self) -> Option<NonZeroU64> {
        self.doc.long_context_threshold()
    }
}
