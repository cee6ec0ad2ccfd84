//! Named-entity recognition client
//!
//! Extraction is delegated to a hosted token-classification model
//! (Hugging Face inference API shape). The client is built once at
//! startup and shared read-only across requests; inference has no side
//! effects, so no locking is needed.

use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::models::EntitySpan;
use crate::sources::build_http_client;
use crate::Result;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, info};

/// Trait for entity extraction backends
#[async_trait::async_trait]
pub trait EntityExtractor: Send + Sync {
    /// Tag spans in `text`; every span carries its entity group label
    async fn extract(&self, text: &str) -> Result<Vec<EntitySpan>>;
}

/// Reusable inference client (connection-pooled)
pub struct HuggingFaceNerClient {
    client: Client,
    api_url: String,
    api_token: Option<String>,
}

impl HuggingFaceNerClient {
    pub fn new(client: Client, api_url: String, api_token: Option<String>) -> Self {
        Self {
            client,
            api_url,
            api_token,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            build_http_client(config.ner_timeout)?,
            config.ner_api_url.clone(),
            config.hf_api_token.clone(),
        ))
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    /// Merge word pieces into whole entity spans
    aggregation_strategy: &'static str,
}

#[async_trait::async_trait]
impl EntityExtractor for HuggingFaceNerClient {
    async fn extract(&self, text: &str) -> Result<Vec<EntitySpan>> {
        let request = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                aggregation_strategy: "simple",
            },
        };

        info!("Calling NER inference endpoint");

        let mut builder = self.client.post(&self.api_url).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            error!("NER request failed: {}", e);
            AnalysisError::ExtractionError(format!("NER request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("NER error response ({}): {}", status, error_text);
            return Err(AnalysisError::ExtractionError(format!(
                "NER endpoint returned {}: {}",
                status, error_text
            )));
        }

        let spans: Vec<EntitySpan> = response.json().await.map_err(|e| {
            error!("Failed to parse NER response: {}", e);
            AnalysisError::ExtractionError(format!("NER parse error: {}", e))
        })?;

        debug!(span_count = spans.len(), "NER spans received");

        Ok(spans)
    }
}

/// Organization names from `spans`, deduplicated by exact match.
///
/// First-seen order is kept so responses are stable for the same input.
/// Words are compared as tagged, without trimming; only empty words are
/// skipped, since an empty name would match every sanctions document.
pub fn organization_names(spans: &[EntitySpan]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for span in spans.iter().filter(|s| s.is_organization()) {
        let name = span.word.as_str();
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::serve;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::time::Duration;

    fn span(group: &str, word: &str) -> EntitySpan {
        EntitySpan {
            entity_group: group.to_string(),
            word: word.to_string(),
            score: 0.99,
            start: None,
            end: None,
        }
    }

    #[test]
    fn test_only_organizations_kept() {
        let spans = vec![
            span("PER", "John Smith"),
            span("ORG", "Acme Capital Partners"),
            span("LOC", "Cayman Islands"),
            span("MISC", "Swiss"),
        ];
        assert_eq!(organization_names(&spans), vec!["Acme Capital Partners"]);
    }

    #[test]
    fn test_duplicates_removed_in_first_seen_order() {
        let spans = vec![
            span("ORG", "Offshore Holdings Trust"),
            span("ORG", "Acme Capital Partners"),
            span("ORG", "Offshore Holdings Trust"),
            span("ORG", ""),
        ];
        assert_eq!(
            organization_names(&spans),
            vec!["Offshore Holdings Trust", "Acme Capital Partners"]
        );
    }

    #[test]
    fn test_dedupe_is_exact_match_on_tagged_word() {
        let spans = vec![span("ORG", "Acme"), span("ORG", " Acme "), span("ORG", "Acme")];
        assert_eq!(organization_names(&spans), vec!["Acme", " Acme "]);
    }

    #[test]
    fn test_request_serialization() {
        let request = InferenceRequest {
            inputs: "Acme paid Globex",
            parameters: InferenceParameters {
                aggregation_strategy: "simple",
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["inputs"], "Acme paid Globex");
        assert_eq!(value["parameters"]["aggregation_strategy"], "simple");
    }

    async fn inference(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer hf_test") {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid token" })));
        }
        assert_eq!(body["parameters"]["aggregation_strategy"], "simple");
        (
            StatusCode::OK,
            Json(json!([
                { "entity_group": "ORG", "word": "Acme Capital Partners", "score": 0.998, "start": 0, "end": 21 },
                { "entity_group": "LOC", "word": "Geneva", "score": 0.97, "start": 40, "end": 46 }
            ])),
        )
    }

    #[tokio::test]
    async fn test_extract_parses_spans() {
        let base = serve(Router::new().route("/models/ner", post(inference))).await;
        let client = HuggingFaceNerClient::new(
            build_http_client(Duration::from_secs(5)).unwrap(),
            format!("{}/models/ner", base),
            Some("hf_test".to_string()),
        );

        let spans = client
            .extract("Acme Capital Partners wired funds to Geneva.")
            .await
            .unwrap();
        assert_eq!(spans.len(), 2);
        assert!(spans[0].is_organization());
        assert_eq!(spans[0].start, Some(0));
        assert_eq!(spans[1].word, "Geneva");
    }

    #[tokio::test]
    async fn test_rejected_request_is_extraction_error() {
        let base = serve(Router::new().route("/models/ner", post(inference))).await;
        let client = HuggingFaceNerClient::new(
            build_http_client(Duration::from_secs(5)).unwrap(),
            format!("{}/models/ner", base),
            None,
        );

        let err = client.extract("Acme").await.unwrap_err();
        assert!(matches!(err, AnalysisError::ExtractionError(_)));
        assert!(err.to_string().contains("401"));
    }
}
