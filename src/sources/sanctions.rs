//! Consolidated sanctions list lookup
//!
//! The list document is fetched on every lookup and searched for the
//! entity name as a case-insensitive substring.

use super::SanctionsSource;
use crate::error::AnalysisError;
use crate::Result;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

pub struct SanctionsListClient {
    client: Client,
    list_url: String,
}

impl SanctionsListClient {
    pub fn new(client: Client, list_url: String) -> Self {
        Self { client, list_url }
    }
}

#[async_trait::async_trait]
impl SanctionsSource for SanctionsListClient {
    async fn is_sanctioned(&self, name: &str) -> Result<bool> {
        let response = self
            .client
            .get(&self.list_url)
            .send()
            .await
            .map_err(|e| {
                AnalysisError::SourceError(format!("Sanctions list request failed: {}", e))
            })?;

        if response.status() != StatusCode::OK {
            warn!(
                status = %response.status(),
                "Sanctions list unavailable, treating entity as not listed"
            );
            return Ok(false);
        }

        let document = response.text().await.map_err(|e| {
            AnalysisError::SourceError(format!("Failed to read sanctions list: {}", e))
        })?;

        let listed = document.to_lowercase().contains(&name.to_lowercase());
        debug!(entity = %name, listed, "Sanctions list checked");

        Ok(listed)
    }
}
