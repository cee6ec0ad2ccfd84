//! Wikipedia page summary lookup
//!
//! Degrades to placeholder text instead of failing when the page is
//! missing or the service answers with a non-success status.

use super::SummarySource;
use crate::error::AnalysisError;
use crate::Result;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

pub const NO_SUMMARY: &str = "No summary available.";
pub const NO_DATA: &str = "No data available.";

#[derive(Debug, Deserialize)]
struct PageSummary {
    extract: Option<String>,
}

pub struct WikipediaSummaryClient {
    client: Client,
    base_url: String,
}

impl WikipediaSummaryClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Page URL with the entity name as a single percent-encoded segment
    fn page_url(&self, name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AnalysisError::ConfigError(format!("Invalid summary API URL {}: {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                AnalysisError::ConfigError(format!(
                    "Summary API URL cannot have path segments: {}",
                    self.base_url
                ))
            })?
            .push(name);

        Ok(url)
    }
}

#[async_trait::async_trait]
impl SummarySource for WikipediaSummaryClient {
    async fn summary(&self, name: &str) -> Result<String> {
        let url = self.page_url(name)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            AnalysisError::SourceError(format!("Summary request failed for {}: {}", name, e))
        })?;

        if response.status() != StatusCode::OK {
            warn!(entity = %name, status = %response.status(), "No summary page");
            return Ok(NO_DATA.to_string());
        }

        let page: PageSummary = response.json().await.map_err(|e| {
            AnalysisError::SourceError(format!("Invalid summary response for {}: {}", name, e))
        })?;

        debug!(entity = %name, has_extract = page.extract.is_some(), "Summary fetched");

        Ok(page.extract.unwrap_or_else(|| NO_SUMMARY.to_string()))
    }
}
