//! Transaction analyzer - the per-request pipeline
//!
//! EXTRACT → FILTER ORG → DEDUPE → (CLASSIFY → LOOKUP ×3 → SCORE) per entity → FOLD
//!
//! Lookups run strictly one after another. The first failing call aborts
//! the whole analysis; there is no partial result.

use crate::classifier::EntityClassifier;
use crate::models::{push_unique, EntitySignals, TransactionAnalysis, TransactionRequest};
use crate::ner::{organization_names, EntityExtractor};
use crate::scoring::RiskScorer;
use crate::sources::SignalSources;
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Coordinates extraction, lookups and scoring for one transaction at a time
pub struct TransactionAnalyzer {
    extractor: Arc<dyn EntityExtractor>,
    sources: SignalSources,
    scorer: RiskScorer,
}

impl TransactionAnalyzer {
    pub fn new(extractor: Arc<dyn EntityExtractor>, sources: SignalSources) -> Self {
        Self::with_scorer(extractor, sources, RiskScorer::default())
    }

    pub fn with_scorer(
        extractor: Arc<dyn EntityExtractor>,
        sources: SignalSources,
        scorer: RiskScorer,
    ) -> Self {
        Self {
            extractor,
            sources,
            scorer,
        }
    }

    pub async fn analyze(&self, request: TransactionRequest) -> Result<TransactionAnalysis> {
        let analysis_id = Uuid::new_v4();
        let span = info_span!(
            "analyze_transaction",
            %analysis_id,
            transaction_id = request.transaction_id.as_deref().unwrap_or("-")
        );

        self.run(request).instrument(span).await
    }

    async fn run(&self, request: TransactionRequest) -> Result<TransactionAnalysis> {
        let start = Instant::now();
        let mut analysis = TransactionAnalysis::empty(request.transaction_id);

        if request.details.trim().is_empty() {
            info!("Empty transaction details, nothing to analyze");
            return Ok(analysis);
        }

        let spans = self.extractor.extract(&request.details).await?;
        let entities = organization_names(&spans);

        info!(
            span_count = spans.len(),
            entity_count = entities.len(),
            "Entities extracted"
        );

        for name in entities {
            let signals = self.collect_signals(name).await?;
            let assessment = self.scorer.assess(&signals);

            info!(
                entity = %signals.name,
                entity_type = %signals.entity_type,
                risk_score = assessment.risk_score,
                "Entity assessed"
            );

            analysis.risk_score = analysis.risk_score.max(assessment.risk_score);
            analysis.confidence_score = analysis.confidence_score.max(assessment.confidence_score);

            for label in self.sources.evidence_labels() {
                push_unique(&mut analysis.supporting_evidence, label);
            }
            for reason in &assessment.reasons {
                push_unique(&mut analysis.reasons, reason);
            }

            analysis.entity_types.push(signals.entity_type);
            analysis.extracted_entities.push(signals.name);
        }

        info!(
            risk_score = analysis.risk_score,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Transaction analysis completed"
        );

        Ok(analysis)
    }

    /// Classify and query all three sources, in order.
    async fn collect_signals(&self, name: String) -> Result<EntitySignals> {
        let entity_type = EntityClassifier::classify(&name);
        let on_sanctions_list = self.sources.sanctions.is_sanctioned(&name).await?;
        let registry_registered = self.sources.registry.is_registered(&name).await?;
        let summary = self.sources.summary.summary(&name).await?;

        Ok(EntitySignals {
            name,
            entity_type,
            on_sanctions_list,
            registry_registered,
            summary,
        })
    }
}

//
// ================= Tests =================
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::models::{EntitySpan, EntityType};
    use crate::scoring::NO_RISK_REASON;
    use crate::sources::{RegistrySource, SanctionsSource, SummarySource};
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct FixedExtractor(Vec<(&'static str, &'static str)>);

    #[async_trait::async_trait]
    impl EntityExtractor for FixedExtractor {
        async fn extract(&self, _text: &str) -> Result<Vec<EntitySpan>> {
            Ok(self
                .0
                .iter()
                .map(|(group, word)| EntitySpan {
                    entity_group: group.to_string(),
                    word: word.to_string(),
                    score: 0.99,
                    start: None,
                    end: None,
                })
                .collect())
        }
    }

    struct FailingExtractor;

    #[async_trait::async_trait]
    impl EntityExtractor for FailingExtractor {
        async fn extract(&self, _text: &str) -> Result<Vec<EntitySpan>> {
            Err(AnalysisError::ExtractionError("model offline".into()))
        }
    }

    /// In-memory sources that record every lookup
    #[derive(Default)]
    struct FakeSources {
        sanctioned: HashSet<&'static str>,
        registered: HashSet<&'static str>,
        summaries: Vec<(&'static str, &'static str)>,
        fail_registry_for: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl SanctionsSource for FakeSources {
        async fn is_sanctioned(&self, name: &str) -> Result<bool> {
            self.calls.lock().unwrap().push(format!("sanctions:{}", name));
            Ok(self.sanctioned.contains(name))
        }
    }

    #[async_trait::async_trait]
    impl RegistrySource for FakeSources {
        async fn is_registered(&self, name: &str) -> Result<bool> {
            self.calls.lock().unwrap().push(format!("registry:{}", name));
            if self.fail_registry_for == Some(name) {
                return Err(AnalysisError::SourceError("registry timed out".into()));
            }
            Ok(self.registered.contains(name))
        }
    }

    #[async_trait::async_trait]
    impl SummarySource for FakeSources {
        async fn summary(&self, name: &str) -> Result<String> {
            self.calls.lock().unwrap().push(format!("summary:{}", name));
            Ok(self
                .summaries
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, s)| s.to_string())
                .unwrap_or_else(|| "No data available.".to_string()))
        }
    }

    fn analyzer(extractor: impl EntityExtractor + 'static, fake: Arc<FakeSources>) -> TransactionAnalyzer {
        let sources = SignalSources::new(fake.clone(), fake.clone(), fake);
        TransactionAnalyzer::new(Arc::new(extractor), sources)
    }

    fn request(details: &str) -> TransactionRequest {
        TransactionRequest {
            transaction_id: Some("TX-42".to_string()),
            details: details.to_string(),
        }
    }

    #[tokio::test]
    async fn test_acme_offshore_example() {
        let fake = Arc::new(FakeSources {
            sanctioned: HashSet::from(["Offshore Holdings Trust"]),
            registered: HashSet::from(["Acme Capital Partners"]),
            ..Default::default()
        });
        let extractor = FixedExtractor(vec![
            ("ORG", "Acme Capital Partners"),
            ("ORG", "Offshore Holdings Trust"),
        ]);

        let analysis = analyzer(extractor, fake)
            .analyze(request(
                "Acme Capital Partners transferred funds via Offshore Holdings Trust.",
            ))
            .await
            .unwrap();

        assert_eq!(analysis.transaction_id.as_deref(), Some("TX-42"));
        assert_eq!(
            analysis.extracted_entities,
            vec!["Acme Capital Partners", "Offshore Holdings Trust"]
        );
        assert_eq!(
            analysis.entity_types,
            vec![EntityType::InvestmentFirm, EntityType::ShellCompany]
        );
        assert_eq!(analysis.risk_score, 1.0);
        assert_eq!(analysis.confidence_score, 0.95);
        assert_eq!(analysis.supporting_evidence, vec!["Wikidata", "OFAC", "SEC EDGAR"]);
        assert_eq!(
            analysis.reasons,
            vec![
                NO_RISK_REASON.to_string(),
                "Offshore Holdings Trust is on the OFAC sanctions list.".to_string(),
                "Offshore Holdings Trust is not registered with the SEC.".to_string(),
                "Offshore Holdings Trust is flagged as a Shell Company.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_organizations_keeps_zero_defaults() {
        let fake = Arc::new(FakeSources::default());
        let extractor = FixedExtractor(vec![("PER", "Jane Doe"), ("LOC", "Zurich")]);

        let analysis = analyzer(extractor, fake.clone())
            .analyze(request("Jane Doe paid rent in Zurich."))
            .await
            .unwrap();

        assert_eq!(analysis, TransactionAnalysis::empty(Some("TX-42".into())));
        assert!(fake.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_details_skip_extraction() {
        let fake = Arc::new(FakeSources::default());

        let analysis = analyzer(FailingExtractor, fake)
            .analyze(request("   "))
            .await
            .unwrap();

        assert!(analysis.extracted_entities.is_empty());
        assert_eq!(analysis.risk_score, 0.0);
    }

    #[tokio::test]
    async fn test_lookups_run_sequentially_per_entity() {
        let fake = Arc::new(FakeSources {
            registered: HashSet::from(["Globex Corp", "First Bank"]),
            ..Default::default()
        });
        let extractor = FixedExtractor(vec![
            ("ORG", "Globex Corp"),
            ("ORG", "First Bank"),
            ("ORG", "Globex Corp"),
        ]);

        let analysis = analyzer(extractor, fake.clone())
            .analyze(request("Globex Corp paid First Bank."))
            .await
            .unwrap();

        assert_eq!(analysis.extracted_entities, vec!["Globex Corp", "First Bank"]);
        assert_eq!(analysis.risk_score, 0.10);
        assert_eq!(analysis.reasons, vec![NO_RISK_REASON.to_string()]);
        assert_eq!(
            *fake.calls.lock().unwrap(),
            vec![
                "sanctions:Globex Corp",
                "registry:Globex Corp",
                "summary:Globex Corp",
                "sanctions:First Bank",
                "registry:First Bank",
                "summary:First Bank",
            ]
        );
    }

    #[tokio::test]
    async fn test_adverse_summary_raises_score() {
        let fake = Arc::new(FakeSources {
            registered: HashSet::from(["Wirecard"]),
            summaries: vec![("Wirecard", "Wirecard AG collapsed after a fraud scandal.")],
            ..Default::default()
        });
        let extractor = FixedExtractor(vec![("ORG", "Wirecard")]);

        let analysis = analyzer(extractor, fake)
            .analyze(request("Payment processed by Wirecard."))
            .await
            .unwrap();

        assert_eq!(analysis.entity_types, vec![EntityType::Unknown]);
        assert_eq!(analysis.risk_score, 0.30);
        assert_eq!(
            analysis.reasons,
            vec!["Wikipedia mentions controversy or fraud for Wirecard.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_source_failure_aborts_transaction() {
        let fake = Arc::new(FakeSources {
            fail_registry_for: Some("Second Fund"),
            ..Default::default()
        });
        let extractor = FixedExtractor(vec![("ORG", "First Corp"), ("ORG", "Second Fund"), ("ORG", "Third Inc")]);

        let err = analyzer(extractor, fake.clone())
            .analyze(request("First Corp, Second Fund and Third Inc."))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::SourceError(_)));
        let calls = fake.calls.lock().unwrap();
        assert!(!calls.iter().any(|c| c.ends_with("Third Inc")));
        assert!(!calls.contains(&"summary:Second Fund".to_string()));
    }

    #[tokio::test]
    async fn test_extraction_failure_propagates() {
        let fake = Arc::new(FakeSources::default());

        let err = analyzer(FailingExtractor, fake)
            .analyze(request("Acme Capital Partners"))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::ExtractionError(_)));
    }
}
