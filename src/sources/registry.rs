//! SEC EDGAR company search

use super::RegistrySource;
use crate::error::AnalysisError;
use crate::Result;
use reqwest::{header::USER_AGENT, Client, StatusCode};
use tracing::{debug, warn};

/// Marker EDGAR renders when a company search has no hits
const NO_MATCH_MARKER: &str = "No matching companies";

pub struct SecRegistryClient {
    client: Client,
    search_url: String,
    user_agent: String,
}

impl SecRegistryClient {
    pub fn new(client: Client, search_url: String, user_agent: String) -> Self {
        Self {
            client,
            search_url,
            user_agent,
        }
    }
}

#[async_trait::async_trait]
impl RegistrySource for SecRegistryClient {
    async fn is_registered(&self, name: &str) -> Result<bool> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("company", name), ("count", "1"), ("action", "getcompany")])
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                AnalysisError::SourceError(format!("Registry search failed for {}: {}", name, e))
            })?;

        if response.status() != StatusCode::OK {
            warn!(
                entity = %name,
                status = %response.status(),
                "Registry search unavailable, treating entity as unregistered"
            );
            return Ok(false);
        }

        let page = response.text().await.map_err(|e| {
            AnalysisError::SourceError(format!("Failed to read registry search page: {}", e))
        })?;

        let registered = !page.contains(NO_MATCH_MARKER);
        debug!(entity = %name, registered, "Registry checked");

        Ok(registered)
    }
}
