//! Risk scoring for a single entity
//!
//! Rules-based: each rule contributes a fixed weight and a reason when it
//! fires. The scorer owns the arithmetic (baseline, cap, rounding).

use crate::models::{push_unique, EntitySignals, RiskAssessment};
use tracing::debug;

/// Raw score assigned when no rule fires.
const BASELINE_SCORE: u32 = 10;
/// Raw score at which the normalized score saturates at 1.0.
const MAX_RAW_SCORE: u32 = 100;
/// Confidence is a constant, not a computed quantity.
pub const CONFIDENCE_SCORE: f64 = 0.95;

pub const NO_RISK_REASON: &str = "No significant risk detected";

/// Trait for risk rules
pub trait RiskRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Points added to the raw score when the rule fires
    fn weight(&self) -> u32;

    /// Returns the reason when the rule fires
    fn evaluate(&self, signals: &EntitySignals) -> Option<String>;
}

/// Scorer that sums the weights of all firing rules
pub struct RiskScorer {
    rules: Vec<Box<dyn RiskRule>>,
}

impl RiskScorer {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add_rule(&mut self, rule: Box<dyn RiskRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Assess one entity (SYNC — pure function of the signals)
    pub fn assess(&self, signals: &EntitySignals) -> RiskAssessment {
        let mut raw_score = 0u32;
        let mut reasons = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            if let Some(reason) = rule.evaluate(signals) {
                raw_score += rule.weight();
                push_unique(&mut reasons, &reason);

                debug!(
                    entity = %signals.name,
                    rule = rule.name(),
                    weight = rule.weight(),
                    "Risk rule fired"
                );
            }
        }

        if raw_score == 0 {
            raw_score = BASELINE_SCORE;
        }

        if reasons.is_empty() {
            reasons.push(NO_RISK_REASON.to_string());
        }

        RiskAssessment {
            risk_score: normalize(raw_score),
            confidence_score: CONFIDENCE_SCORE,
            reasons,
        }
    }
}

impl Default for RiskScorer {
    /// The four standard rules, in reporting order
    fn default() -> Self {
        let mut scorer = Self::new();
        scorer.add_rule(Box::new(SanctionsListRule));
        scorer.add_rule(Box::new(UnregisteredEntityRule));
        scorer.add_rule(Box::new(AdverseMediaRule));
        scorer.add_rule(Box::new(OpaqueStructureRule));
        scorer
    }
}

/// Cap at 100, scale to [0, 1], round to 2 decimals.
fn normalize(raw_score: u32) -> f64 {
    let capped = raw_score.min(MAX_RAW_SCORE) as f64 / MAX_RAW_SCORE as f64;
    (capped * 100.0).round() / 100.0
}

//
// ================= Rules =================
//

/// Rule: entity appears on the sanctions list
pub struct SanctionsListRule;

impl RiskRule for SanctionsListRule {
    fn name(&self) -> &'static str {
        "sanctions_list"
    }

    fn weight(&self) -> u32 {
        50
    }

    fn evaluate(&self, signals: &EntitySignals) -> Option<String> {
        signals
            .on_sanctions_list
            .then(|| format!("{} is on the OFAC sanctions list.", signals.name))
    }
}

/// Rule: entity has no filing in the corporate registry
pub struct UnregisteredEntityRule;

impl RiskRule for UnregisteredEntityRule {
    fn name(&self) -> &'static str {
        "unregistered_entity"
    }

    fn weight(&self) -> u32 {
        20
    }

    fn evaluate(&self, signals: &EntitySignals) -> Option<String> {
        (!signals.registry_registered)
            .then(|| format!("{} is not registered with the SEC.", signals.name))
    }
}

/// Rule: encyclopedia summary mentions controversy or fraud
pub struct AdverseMediaRule;

const ADVERSE_TERMS: &[&str] = &["controversy", "fraud"];

impl RiskRule for AdverseMediaRule {
    fn name(&self) -> &'static str {
        "adverse_media"
    }

    fn weight(&self) -> u32 {
        30
    }

    fn evaluate(&self, signals: &EntitySignals) -> Option<String> {
        let summary = signals.summary.to_lowercase();

        ADVERSE_TERMS
            .iter()
            .any(|term| summary.contains(*term))
            .then(|| {
                format!(
                    "Wikipedia mentions controversy or fraud for {}.",
                    signals.name
                )
            })
    }
}

/// Rule: entity is a shell company or offshore entity
pub struct OpaqueStructureRule;

impl RiskRule for OpaqueStructureRule {
    fn name(&self) -> &'static str {
        "opaque_structure"
    }

    fn weight(&self) -> u32 {
        60
    }

    fn evaluate(&self, signals: &EntitySignals) -> Option<String> {
        signals.entity_type.is_opaque_structure().then(|| {
            format!(
                "{} is flagged as a {}.",
                signals.name, signals.entity_type
            )
        })
    }
}

//
// ================= Tests =================
//
