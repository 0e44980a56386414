//! Shared fixtures for unit tests.

use crate::config::{ConfigDocument, Provider, RouterAssignment, RouterRole};

/// Two providers, `default` and `background` bound to anthropic models.
pub(crate) fn sample_document() -> ConfigDocument {
    let mut anthropic = Provider::new("https://api.anthropic.com", "sk-ant-test");
    anthropic.models = vec!["claude-3-5-sonnet".into(), "claude-3-haiku".into()];

    let mut openrouter = Provider::new("https://openrouter.ai/api", "sk-or-test");
    openrouter.models = vec!["gpt-4o".into(), "anthropic/claude-3.5-sonnet".into()];

    let mut doc = ConfigDocument::with_default("anthropic", anthropic, "claude-3-5-sonnet")
        .expect("fixture is valid");
    doc.providers.insert("openrouter".into(), openrouter);
    doc.router.insert(
        RouterRole::Background,
        RouterAssignment::new("anthropic", "claude-3-haiku"),
    );
    doc.validate().expect("fixture is valid");
    doc
}
