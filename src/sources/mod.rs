//! External signal sources
//!
//! Each source answers one question about an organization name with a
//! single network call. Sources share no state and may be queried in any
//! order. HTTP-backed implementations live in the submodules.

use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::Result;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub mod registry;
pub mod sanctions;
pub mod summary;

pub use registry::SecRegistryClient;
pub use sanctions::SanctionsListClient;
pub use summary::WikipediaSummaryClient;

/// Sanctions list membership
#[async_trait::async_trait]
pub trait SanctionsSource: Send + Sync {
    async fn is_sanctioned(&self, name: &str) -> Result<bool>;

    fn evidence_label(&self) -> &'static str {
        "OFAC"
    }
}

/// Corporate registry filing lookup
#[async_trait::async_trait]
pub trait RegistrySource: Send + Sync {
    async fn is_registered(&self, name: &str) -> Result<bool>;

    fn evidence_label(&self) -> &'static str {
        "SEC EDGAR"
    }
}

/// Encyclopedia summary text
#[async_trait::async_trait]
pub trait SummarySource: Send + Sync {
    async fn summary(&self, name: &str) -> Result<String>;

    fn evidence_label(&self) -> &'static str {
        "Wikidata"
    }
}

/// The three sources consulted for every entity
#[derive(Clone)]
pub struct SignalSources {
    pub sanctions: Arc<dyn SanctionsSource>,
    pub registry: Arc<dyn RegistrySource>,
    pub summary: Arc<dyn SummarySource>,
}

impl SignalSources {
    pub fn new(
        sanctions: Arc<dyn SanctionsSource>,
        registry: Arc<dyn RegistrySource>,
        summary: Arc<dyn SummarySource>,
    ) -> Self {
        Self {
            sanctions,
            registry,
            summary,
        }
    }

    /// HTTP-backed sources sharing one connection pool.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = build_http_client(config.upstream_timeout)?;

        Ok(Self::new(
            Arc::new(SanctionsListClient::new(
                client.clone(),
                config.sanctions_list_url.clone(),
            )),
            Arc::new(SecRegistryClient::new(
                client.clone(),
                config.registry_search_url.clone(),
                config.registry_user_agent.clone(),
            )),
            Arc::new(WikipediaSummaryClient::new(
                client,
                config.summary_api_url.clone(),
            )),
        ))
    }

    /// Evidence labels, independent of what the lookups returned.
    pub fn evidence_labels(&self) -> [&'static str; 3] {
        [
            self.summary.evidence_label(),
            self.sanctions.evidence_label(),
            self.registry.evidence_label(),
        ]
    }
}

/// Connection-pooled client with a per-request deadline
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(60))
        .pool_max_idle_per_host(8)
        .timeout(timeout)
        .build()
        .map_err(|e| AnalysisError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}
