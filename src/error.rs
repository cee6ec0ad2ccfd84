//! Error types for the transaction risk analyzer

use axum::http::StatusCode;
use thiserror::Error;

/// Result type alias for analyzer operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {

    // =============================
    // Pipeline Errors
    // =============================

    #[error("Entity extraction error: {0}")]
    ExtractionError(String),

    #[error("Signal source error: {0}")]
    SourceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AnalysisError {
    /// HTTP status reported to the caller when an analysis fails.
    ///
    /// Failures of the extraction model or of an upstream lookup are the
    /// gateway's fault, not the server's.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::ExtractionError(_) | AnalysisError::SourceError(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
