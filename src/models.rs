//! Core data models for transaction risk analysis

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

//
// ================= Enums =================
//

/// Category assigned to an extracted organization name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntityType {
    #[serde(rename = "Shell Company")]
    ShellCompany,
    #[serde(rename = "Investment Firm")]
    InvestmentFirm,
    #[serde(rename = "NGO")]
    Ngo,
    #[serde(rename = "Financial Institution")]
    FinancialInstitution,
    #[serde(rename = "Corporation")]
    Corporation,
    /// Never produced by the keyword classifier; scored like a shell company.
    #[serde(rename = "Offshore Entity")]
    OffshoreEntity,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::ShellCompany => "Shell Company",
            EntityType::InvestmentFirm => "Investment Firm",
            EntityType::Ngo => "NGO",
            EntityType::FinancialInstitution => "Financial Institution",
            EntityType::Corporation => "Corporation",
            EntityType::OffshoreEntity => "Offshore Entity",
            EntityType::Unknown => "Unknown",
        }
    }

    /// Structures that hide beneficial ownership.
    pub fn is_opaque_structure(&self) -> bool {
        matches!(self, EntityType::ShellCompany | EntityType::OffshoreEntity)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ================= Extraction =================
//

/// A span tagged by the named-entity recognition model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntitySpan {
    pub entity_group: String,
    pub word: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end: Option<usize>,
}

impl EntitySpan {
    pub const ORGANIZATION: &'static str = "ORG";

    pub fn is_organization(&self) -> bool {
        self.entity_group == Self::ORGANIZATION
    }
}

//
// ================= Signals =================
//

/// Everything known about one entity within one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySignals {
    pub name: String,
    pub entity_type: EntityType,
    pub on_sanctions_list: bool,
    pub registry_registered: bool,
    pub summary: String,
}

//
// ================= Risk =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub confidence_score: f64,
    /// Whole reason strings, insertion ordered, no duplicates.
    pub reasons: Vec<String>,
}

//
// ================= Request / Response =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub details: String,
}

/// Transaction-level result. Lists are joined with ", " only on the wire.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionAnalysis {
    #[serde(rename = "Transaction_ID")]
    pub transaction_id: Option<String>,

    #[serde(rename = "Extracted_Entities", serialize_with = "serialize_joined")]
    pub extracted_entities: Vec<String>,

    #[serde(rename = "Entity_Type", serialize_with = "serialize_joined")]
    pub entity_types: Vec<EntityType>,

    #[serde(rename = "Risk_Score")]
    pub risk_score: f64,

    #[serde(rename = "Supporting_Evidence", serialize_with = "serialize_joined")]
    pub supporting_evidence: Vec<String>,

    #[serde(rename = "Confidence_Score")]
    pub confidence_score: f64,

    #[serde(rename = "Reason", serialize_with = "serialize_joined")]
    pub reasons: Vec<String>,
}

impl TransactionAnalysis {
    /// Result for a transaction in which no organization was found.
    pub fn empty(transaction_id: Option<String>) -> Self {
        Self {
            transaction_id,
            extracted_entities: Vec::new(),
            entity_types: Vec::new(),
            risk_score: 0.0,
            supporting_evidence: Vec::new(),
            confidence_score: 0.0,
            reasons: Vec::new(),
        }
    }
}

fn serialize_joined<T, S>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    let joined = items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    serializer.serialize_str(&joined)
}

/// Push `value` unless an equal string is already present.
pub(crate) fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
