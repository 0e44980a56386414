//! Typed entities of the routing configuration.

use std::num::NonZeroU64;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

// =============================================================================
// Router Roles
// =============================================================================

/// One of the fixed router slots a model can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouterRole {
    /// Fallback for every request; must always be assigned.
    Default,
    /// Cheap model for background tasks.
    Background,
    /// Reasoning-heavy requests.
    Think,
    /// Requests whose token count exceeds the long-context threshold.
    LongContext,
    /// Requests that use web search.
    WebSearch,
}

impl RouterRole {
    /// Get all roles in canonical order.
    pub fn all() -> &'static [RouterRole] {
        &[
            Self::Default,
            Self::Background,
            Self::Think,
            Self::LongContext,
            Self::WebSearch,
        ]
    }

    /// Name used in the config file and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Background => "background",
            Self::Think => "think",
            Self::LongContext => "longContext",
            Self::WebSearch => "webSearch",
        }
    }
}

impl std::fmt::Display for RouterRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouterRole {
    type Err = ConfigError;

    /// Accepts the canonical camelCase names plus lowercase, kebab and snake
    /// spellings (`longcontext`, `long-context`, `long_context`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "default" => Ok(Self::Default),
            "background" => Ok(Self::Background),
            "think" => Ok(Self::Think),
            "longcontext" => Ok(Self::LongContext),
            "websearch" => Ok(Self::WebSearch),
            _ => Err(ConfigError::UnknownRole(s.to_string())),
        }
    }
}

// =============================================================================
// Providers
// =============================================================================

/// A remote model source with its credential and the models it offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// API base URL, without the `/v1/models` suffix.
    pub base_url: String,
    /// Stored verbatim, never validated.
    #[serde(default)]
    pub api_key: String,
    /// Model ids in insertion order.
    #[serde(default)]
    pub models: Vec<String>,
    /// Keys this tool does not understand, kept so a save does not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Provider {
    /// Create a provider with no models.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            models: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Check if this provider offers the given model.
    pub fn has_model(&self, model_id: &str) -> bool {
        self.models.iter().any(|m| m == model_id)
    }
}

/// A model resolved against its owning provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Model<'a> {
    pub provider_id: &'a str,
    pub id: &'a str,
}

impl std::fmt::Display for Model<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.provider_id, self.id)
    }
}

// =============================================================================
// Router Assignments
// =============================================================================

/// A (provider, model) pair bound to a router role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterAssignment {
    pub provider_id: String,
    pub model_id: String,
    /// Token threshold; only meaningful on the `longContext` router.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<NonZeroU64>,
}

impl RouterAssignment {
    pub fn new(provider_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            model_id: model_id.into(),
            threshold: None,
        }
    }

    /// Check if this assignment points at the given model.
    pub fn targets(&self, provider_id: &str, model_id: &str) -> bool {
        self.provider_id == provider_id && self.model_id == model_id
    }
}

impl std::fmt::Display for RouterAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.provider_id, self.model_id)
    }
}
