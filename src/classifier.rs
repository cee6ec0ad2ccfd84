//! Entity Classifier
//!
//! Assigns an organization name to a category by keyword:
//! - Shell Company: holding and trust vehicles
//! - Investment Firm, NGO, Financial Institution, Corporation
//! - Unknown when nothing matches

use crate::models::EntityType;

/// Static keyword groups in match priority order — zero allocation
const KEYWORD_GROUPS: &[(EntityType, &[&str])] = &[
    (
        EntityType::ShellCompany,
        &["holdings", "trust", "offshore", "fund", "management"],
    ),
    (
        EntityType::InvestmentFirm,
        &["capital", "partners", "investment"],
    ),
    (
        EntityType::Ngo,
        &["foundation", "association", "charity", "nonprofit"],
    ),
    (EntityType::FinancialInstitution, &["bank"]),
    (EntityType::Corporation, &["corp", "inc", "ltd", "llc"]),
];

/// Entity classifier
pub struct EntityClassifier;

impl EntityClassifier {
    /// Classify an organization name; the first matching group wins.
    pub fn classify(name: &str) -> EntityType {
        let name = name.to_lowercase();

        KEYWORD_GROUPS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| name.contains(*kw)))
            .map(|(entity_type, _)| *entity_type)
            .unwrap_or(EntityType::Unknown)
    }
}
