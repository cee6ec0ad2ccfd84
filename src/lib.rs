//! Transaction Risk Analyzer
//!
//! Screens the organizations named in a free-text transaction description:
//! - Extracts organization names with a hosted NER model
//! - Classifies each name by keyword (shell company, investment firm, ...)
//! - Checks a sanctions list, a corporate registry and an encyclopedia summary
//! - Scores each entity and reports the transaction's worst case
//!
//! PIPELINE:
//! DESCRIPTION → EXTRACT → CLASSIFY → LOOKUP → SCORE → FOLD

pub mod analyzer;
pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod models;
pub mod ner;
pub mod scoring;
pub mod sources;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use analyzer::TransactionAnalyzer;
pub use classifier::EntityClassifier;
pub use scoring::RiskScorer;
