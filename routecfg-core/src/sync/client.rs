//! HTTP transport for provider model listings.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Default request timeout for model listings.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Lists the model ids a provider currently serves.
#[async_trait]
pub trait ModelLister: Send + Sync {
    async fn list_models(&self, base_url: &str, api_key: &str)
        -> Result<Vec<String>, TransportError>;
}

/// Model info from an OpenAI-compatible listing.
#[derive(Debug, Deserialize)]
struct ModelInfo {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<ModelInfo>,
}

/// [`ModelLister`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpModelLister {
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for HttpModelLister {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpModelLister {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Listing endpoint for a base URL: `{base}/v1/models`, ignoring a
    /// trailing `/` on the base.
    pub fn models_url(base_url: &str) -> String {
        format!("{}/v1/models", base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ModelLister for HttpModelLister {
    async fn list_models(
        &self,
        base_url: &str,
        api_key: &str,
    ) -> Result<Vec<String>, TransportError> {
        let url = Self::models_url(base_url);
        debug!(url = %url, "Fetching model listing");

        let mut request = self
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .timeout(self.timeout);
        if !api_key.is_empty() {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Failed to fetch models from {}: {} - {}", url, status, body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let listing: ModelsResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        let ids: Vec<String> = listing
            .data
            .into_iter()
            .map(|m| m.id)
            .filter(|id| !id.is_empty())
            .collect();

        debug!(url = %url, count = ids.len(), "Fetched model listing");
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_models_url() {
        assert_eq!(
            HttpModelLister::models_url("https://api.example.com"),
            "https://api.example.com/v1/models"
        );
        assert_eq!(
            HttpModelLister::models_url("https://api.example.com/"),
            "https://api.example.com/v1/models"
        );
        assert_eq!(
            HttpModelLister::models_url("http://localhost:11434/v1/"),
            "http://localhost:11434/v1/v1/models"
        );
    }

    #[tokio::test]
    async fn test_list_models_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [
                    {"id": "qwen3-32b", "object": "model"},
                    {"id": "", "object": "model"},
                    {"object": "model"},
                    {"id": "llama-3.1-8b", "object": "model"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ids = HttpModelLister::new()
            .list_models(&server.uri(), "sk-test")
            .await
            .unwrap();
        assert_eq!(ids, vec!["qwen3-32b", "llama-3.1-8b"]);
    }

    #[tokio::test]
    async fn test_list_models_appends_v1_to_versioned_base() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"id": "qwen3-32b"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ids = HttpModelLister::new()
            .list_models(&format!("{}/v1", server.uri()), "")
            .await
            .unwrap();
        assert_eq!(ids, vec!["qwen3-32b"]);
    }

    #[tokio::test]
    async fn test_list_models_without_key_sends_no_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .mount(&server)
            .await;

        let ids = HttpModelLister::new()
            .list_models(&server.uri(), "")
            .await
            .unwrap();
        assert!(ids.is_empty());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_list_models_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = HttpModelLister::new()
            .list_models(&server.uri(), "wrong")
            .await
            .unwrap_err();
        match err {
            TransportError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_models_bad_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = HttpModelLister::new()
            .list_models(&server.uri(), "k")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_list_models_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = HttpModelLister::with_timeout(Duration::from_millis(100))
            .list_models(&server.uri(), "k")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }
}
