//! Additive reconciliation of remote model listings.

use tracing::{info, warn};

use super::client::ModelLister;
use crate::config::ConfigDocument;
use crate::error::{ConfigError, Result};
use crate::models::ProviderModelRegistry;

/// Result of syncing one provider during [`RemoteModelSync::sync_all`].
#[derive(Debug)]
pub struct SyncReport {
    pub provider: String,
    pub outcome: SyncOutcome,
}

#[derive(Debug)]
pub enum SyncOutcome {
    /// Listing merged; `total` is the provider's model count afterwards.
    Synced { added: Vec<String>, total: usize },
    /// Provider has no base URL to query.
    Skipped,
    /// Listing failed; the provider was left unchanged.
    Failed(ConfigError),
}

/// Merges what providers report at `/v1/models` into the document.
///
/// Merges only ever add models. A model missing from a listing is kept,
/// and router bindings are never touched.
pub struct RemoteModelSync<'a> {
    doc: &'a mut ConfigDocument,
    lister: &'a dyn ModelLister,
}

impl<'a> RemoteModelSync<'a> {
    pub fn new(doc: &'a mut ConfigDocument, lister: &'a dyn ModelLister) -> Self {
        Self { doc, lister }
    }

    /// Fetch one provider's listing and add the models it does not know yet.
    ///
    /// Returns the newly added ids. On transport failure the provider is
    /// left unchanged and [`ConfigError::Sync`] is returned.
    pub async fn sync_provider(&mut self, provider_id: &str) -> Result<Vec<String>> {
        let provider = self.doc.provider(provider_id)?;
        let (base_url, api_key) = (provider.base_url.clone(), provider.api_key.clone());

        let remote = self
            .lister
            .list_models(&base_url, &api_key)
            .await
            .map_err(|source| ConfigError::Sync {
                provider: provider_id.to_string(),
                source,
            })?;

        let added = ProviderModelRegistry::new(&mut *self.doc).merge_models(provider_id, &remote)?;
        info!(
            provider = %provider_id,
            remote = remote.len(),
            added = added.len(),
            "Synced provider models"
        );
        Ok(added)
    }

    /// Sync every provider in id order.
    ///
    /// One provider failing does not stop the rest; merges that succeeded
    /// stay applied.
    pub async fn sync_all(&mut self) -> Vec<SyncReport> {
        let targets: Vec<(String, bool)> = self
            .doc
            .providers()
            .map(|(id, p)| (id.to_string(), p.base_url.trim().is_empty()))
            .collect();

        let mut reports = Vec::with_capacity(targets.len());
        for (provider, no_base_url) in targets {
            let outcome = if no_base_url {
                warn!(provider = %provider, "Skipping provider without base URL");
                SyncOutcome::Skipped
            } else {
                match self.sync_provider(&provider).await {
                    Ok(added) => {
                        let total = self
                            .doc
                            .provider(&provider)
                            .map(|p| p.models.len())
                            .unwrap_or_default();
                        SyncOutcome::Synced { added, total }
                    }
                    Err(e) => {
                        warn!(provider = %provider, error = %e, "Provider sync failed");
                        SyncOutcome::Failed(e)
                    }
                }
            };
            reports.push(SyncReport { provider, outcome });
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::{Provider, RouterRole};
    use crate::sync::TransportError;
    use crate::test_support::sample_document;

    /// Serves canned listings keyed by base URL and records each call.
    #[derive(Default)]
    struct FakeLister {
        listings: HashMap<String, Vec<String>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeLister {
        fn with(mut self, base_url: &str, models: &[&str]) -> Self {
            self.listings.insert(
                base_url.to_string(),
                models.iter().map(|m| m.to_string()).collect(),
            );
            self
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelLister for FakeLister {
        async fn list_models(
            &self,
            base_url: &str,
            api_key: &str,
        ) -> Result<Vec<String>, TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push((base_url.to_string(), api_key.to_string()));
            self.listings
                .get(base_url)
                .cloned()
                .ok_or_else(|| TransportError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                })
        }
    }

    fn doc_with_local_models(models: &[&str]) -> ConfigDocument {
        let mut provider = Provider::new("http://local", "key-1");
        provider.models = models.iter().map(|m| m.to_string()).collect();
        ConfigDocument::with_default("local", provider, models[0]).unwrap()
    }

    #[tokio::test]
    async fn test_sync_is_additive() {
        let mut doc = doc_with_local_models(&["A", "B"]);
        let lister = FakeLister::default().with("http://local", &["B", "C"]);

        let added = RemoteModelSync::new(&mut doc, &lister)
            .sync_provider("local")
            .await
            .unwrap();

        assert_eq!(added, vec!["C"]);
        assert_eq!(doc.provider("local").unwrap().models, vec!["A", "B", "C"]);
        assert_eq!(
            lister.calls(),
            vec![("http://local".to_string(), "key-1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_sync_nothing_new() {
        let mut doc = doc_with_local_models(&["A", "B"]);
        let before = doc.clone();
        let lister = FakeLister::default().with("http://local", &["A"]);

        let added = RemoteModelSync::new(&mut doc, &lister)
            .sync_provider("local")
            .await
            .unwrap();
        assert!(added.is_empty());
        assert_eq!(doc, before);
    }

    #[tokio::test]
    async fn test_sync_failure_leaves_provider_unchanged() {
        let mut doc = sample_document();
        let before = doc.clone();
        let lister = FakeLister::default();

        let err = RemoteModelSync::new(&mut doc, &lister)
            .sync_provider("anthropic")
            .await
            .unwrap_err();

        match err {
            ConfigError::Sync { provider, source } => {
                assert_eq!(provider, "anthropic");
                assert!(matches!(source, TransportError::Status { status: 503, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(doc, before);
    }

    #[tokio::test]
    async fn test_sync_unknown_provider() {
        let mut doc = sample_document();
        let lister = FakeLister::default();

        let err = RemoteModelSync::new(&mut doc, &lister)
            .sync_provider("ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::ProviderNotFound(_)));
        assert!(lister.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sync_never_touches_routers() {
        let mut doc = sample_document();
        let routers_before: Vec<_> = doc.routers().map(|(r, a)| (r, a.clone())).collect();
        let lister = FakeLister::default().with("https://api.anthropic.com", &["claude-3-opus"]);

        RemoteModelSync::new(&mut doc, &lister)
            .sync_provider("anthropic")
            .await
            .unwrap();

        let routers_after: Vec<_> = doc.routers().map(|(r, a)| (r, a.clone())).collect();
        assert_eq!(routers_after, routers_before);
        assert!(doc.provider("anthropic").unwrap().has_model("claude-3-haiku"));
        assert_eq!(
            doc.router(RouterRole::Background).unwrap().model_id,
            "claude-3-haiku"
        );
    }

    #[tokio::test]
    async fn test_sync_all_reports_each_provider() {
        let mut doc = sample_document();
        doc.providers
            .insert("offline".to_string(), Provider::new("", ""));
        let lister = FakeLister::default().with("https://api.anthropic.com", &["claude-3-opus"]);

        let reports = RemoteModelSync::new(&mut doc, &lister).sync_all().await;

        let names: Vec<&str> = reports.iter().map(|r| r.provider.as_str()).collect();
        assert_eq!(names, vec!["anthropic", "offline", "openrouter"]);

        match &reports[0].outcome {
            SyncOutcome::Synced { added, total } => {
                assert_eq!(added, &vec!["claude-3-opus".to_string()]);
                assert_eq!(*total, 3);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(matches!(reports[1].outcome, SyncOutcome::Skipped));
        assert!(matches!(
            reports[2].outcome,
            SyncOutcome::Failed(ConfigError::Sync { .. })
        ));

        assert!(doc.provider("anthropic").unwrap().has_model("claude-3-opus"));
        assert_eq!(doc.provider("openrouter").unwrap().models.len(), 2);
        assert_eq!(lister.calls().len(), 2);
    }
}
