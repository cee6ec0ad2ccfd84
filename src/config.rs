//! Environment-driven configuration
//!
//! Binaries call `dotenv::dotenv().ok()` first, so a local `.env` file
//! works the same as exported variables.

use crate::error::AnalysisError;
use crate::Result;
use std::env;
use std::time::Duration;

pub const DEFAULT_NER_URL: &str =
    "https://api-inference.huggingface.co/models/dbmdz/bert-large-cased-finetuned-conll03-english";
pub const DEFAULT_SANCTIONS_LIST_URL: &str =
    "https://scsanctions.un.org/resources/xml/en/consolidated.xml";
pub const DEFAULT_REGISTRY_SEARCH_URL: &str = "https://www.sec.gov/cgi-bin/browse-edgar";
pub const DEFAULT_SUMMARY_API_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    /// The single origin allowed to call the API from a browser
    pub allowed_origin: String,
    pub ner_api_url: String,
    pub hf_api_token: Option<String>,
    pub ner_timeout: Duration,
    pub sanctions_list_url: String,
    pub registry_search_url: String,
    pub registry_user_agent: String,
    pub summary_api_url: String,
    pub upstream_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            allowed_origin: "http://localhost:3000".to_string(),
            ner_api_url: DEFAULT_NER_URL.to_string(),
            hf_api_token: None,
            ner_timeout: Duration::from_secs(30),
            sanctions_list_url: DEFAULT_SANCTIONS_LIST_URL.to_string(),
            registry_search_url: DEFAULT_REGISTRY_SEARCH_URL.to_string(),
            registry_user_agent: "Mozilla/5.0".to_string(),
            summary_api_url: DEFAULT_SUMMARY_API_URL.to_string(),
            upstream_timeout: Duration::from_secs(5),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT").or_else(|| get("API_PORT")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AnalysisError::ConfigError(format!("PORT must be a valid port number, got '{}'", raw))
            })?,
            None => defaults.port,
        };

        Ok(Self {
            port,
            allowed_origin: get("ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
            ner_api_url: get("NER_API_URL").unwrap_or(defaults.ner_api_url),
            hf_api_token: get("HF_API_TOKEN"),
            ner_timeout: parse_secs(get("NER_TIMEOUT_SECS"), "NER_TIMEOUT_SECS", defaults.ner_timeout)?,
            sanctions_list_url: get("SANCTIONS_LIST_URL").unwrap_or(defaults.sanctions_list_url),
            registry_search_url: get("REGISTRY_SEARCH_URL").unwrap_or(defaults.registry_search_url),
            registry_user_agent: get("REGISTRY_USER_AGENT").unwrap_or(defaults.registry_user_agent),
            summary_api_url: get("SUMMARY_API_URL").unwrap_or(defaults.summary_api_url),
            upstream_timeout: parse_secs(
                get("UPSTREAM_TIMEOUT_SECS"),
                "UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout,
            )?,
        })
    }
}

fn parse_secs(raw: Option<String>, key: &str, default: Duration) -> Result<Duration> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| {
                AnalysisError::ConfigError(format!("{} must be a whole number of seconds, got '{}'", key, raw))
            }),
        None => Ok(default),
    }
}
