//! End-to-end evaluation: classify, score, aggregate and assemble the
//! outward [`EvaluationResult`].

pub mod evidence;

use serde::Serialize;

use crate::error::EngineResult;
use crate::scenario::{
    normalize_duration, validate_scenario, ClinicalScenario, NormalizedDuration, ScenarioInput,
    Severity, ValidationIssue,
};
use crate::scoring::explanation::recommendation;
use crate::scoring::{
    aggregate, build_explanation, classify, generate_alternatives, Alternative, Category,
    Classification, ClinicalFactor, Confidence, Explanation, MatchKind, ScorerRegistry,
    ScoringContext, Topic, BASELINE_SCORE,
};
pub use evidence::{evidence_for, EvidenceLink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    Green,
    Yellow,
    Red,
}

impl From<Category> for TrafficLight {
    fn from(category: Category) -> Self {
        match category {
            Category::Appropriate => TrafficLight::Green,
            Category::Uncertain => TrafficLight::Yellow,
            Category::Inappropriate => TrafficLight::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
    DirectMatch,
    SimilarMatch,
    GeneralGuidance,
    InsufficientData,
}

impl CoverageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageStatus::DirectMatch => "DIRECT_MATCH",
            CoverageStatus::SimilarMatch => "SIMILAR_MATCH",
            CoverageStatus::GeneralGuidance => "GENERAL_GUIDANCE",
            CoverageStatus::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

impl From<&Classification> for CoverageStatus {
    fn from(classification: &Classification) -> Self {
        match classification.kind {
            Some(MatchKind::Phrase) => CoverageStatus::DirectMatch,
            Some(MatchKind::Abbreviation) => CoverageStatus::SimilarMatch,
            None => CoverageStatus::GeneralGuidance,
        }
    }
}

/// Core scoring result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiieResult {
    pub baseline_score: f64,
    pub factors: Vec<ClinicalFactor>,
    pub final_score: u8,
    pub category: Category,
    pub confidence: Confidence,
    pub recommendation: String,
    pub alternatives: Vec<Alternative>,
    pub evidence_sources: Vec<String>,
}

/// Outward contract of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub topic: Topic,
    pub result: AiieResult,
    pub traffic_light: TrafficLight,
    pub coverage: CoverageStatus,
    pub warnings: Vec<ValidationIssue>,
    pub evidence: Vec<EvidenceLink>,
    pub duration: NormalizedDuration,
    pub explanation: Explanation,
}

impl EvaluationResult {
    pub fn has_critical_warning(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.severity == Severity::Critical)
    }
}

/// Evaluation engine: the scorer registry over compiled-in constants.
///
/// Holds no per-call state, so a single engine can serve concurrent callers.
pub struct Engine {
    registry: ScorerRegistry,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            registry: ScorerRegistry::standard(),
        }
    }

    /// Swap in a custom registry, e.g. with an extra topic scorer
    pub fn with_registry(mut self, registry: ScorerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Score a structurally complete scenario. Never fails.
    pub fn evaluate(&self, scenario: &ClinicalScenario) -> EvaluationResult {
        let classification = classify(&scenario.chief_complaint);
        let duration = normalize_duration(&scenario.duration);
        let warnings = validate_scenario(scenario);

        let ctx = ScoringContext::new(scenario, &duration);
        let topic_score = self
            .registry
            .scorer_for(classification.topic)
            .score(&ctx, BASELINE_SCORE);
        let score = aggregate(&topic_score);

        let alternatives = generate_alternatives(&scenario.proposed_imaging, score.final_score);
        let explanation = build_explanation(classification.topic, &topic_score.factors, &score);

        tracing::debug!(
            topic = %classification.topic,
            score = score.final_score,
            warnings = warnings.len(),
            "evaluated scenario"
        );

        EvaluationResult {
            topic: classification.topic,
            result: AiieResult {
                baseline_score: BASELINE_SCORE,
                recommendation: recommendation(
                    &scenario.proposed_imaging,
                    score.category,
                    &alternatives,
                ),
                factors: topic_score.factors,
                final_score: score.final_score,
                category: score.category,
                confidence: score.confidence,
                alternatives,
                evidence_sources: explanation.citations.clone(),
            },
            traffic_light: score.category.into(),
            coverage: CoverageStatus::from(&classification),
            warnings,
            evidence: evidence_for(classification.topic).to_vec(),
            duration,
            explanation,
        }
    }

    /// Score a raw payload, refusing when structural fields are absent
    pub fn evaluate_input(&self, input: &ScenarioInput) -> EngineResult<EvaluationResult> {
        let scenario = input.clone().into_scenario()?;
        Ok(self.evaluate(&scenario))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate with the compiled-in defaults
pub fn evaluate(scenario: &ClinicalScenario) -> EvaluationResult {
    Engine::default().evaluate(scenario)
}

/// Evaluate a raw payload with the compiled-in defaults
pub fn evaluate_input(input: &ScenarioInput) -> EngineResult<EvaluationResult> {
    Engine::default().evaluate_input(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Modality, PregnancyStatus, ProposedImaging};
    use crate::error::EvaluationError;
    use crate::scoring::{Scorer, TopicScore};

    fn back_pain(age: u32, duration: &str, modality: Modality) -> ClinicalScenario {
        ClinicalScenario::new(
            age,
            "male",
            "Lower back pain",
            duration,
            ProposedImaging::new(modality, "lumbar spine", "low back pain"),
        )
    }

    #[test]
    fn test_uncomplicated_back_pain_is_red() {
        let result = evaluate(&back_pain(45, "3 days", Modality::Mri));

        assert_eq!(result.topic, Topic::LowBackPain);
        assert_eq!(result.result.final_score, 1);
        assert_eq!(result.result.category, Category::Inappropriate);
        assert_eq!(result.traffic_light, TrafficLight::Red);
        assert_eq!(result.coverage, CoverageStatus::DirectMatch);
        assert_eq!(result.result.confidence, Confidence::High);
        assert_eq!(result.result.baseline_score, 5.0);
        assert!(!result.evidence.is_empty());
    }

    #[test]
    fn test_coverage_wire_names() {
        for status in [
            CoverageStatus::DirectMatch,
            CoverageStatus::SimilarMatch,
            CoverageStatus::GeneralGuidance,
            CoverageStatus::InsufficientData,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_generic_coverage() {
        let scenario = ClinicalScenario::new(
            30,
            "female",
            "Knee pain",
            "2 weeks",
            ProposedImaging::new(Modality::Mri, "knee", "knee pain"),
        );
        let result = evaluate(&scenario);
        assert_eq!(result.topic, Topic::Generic);
        assert_eq!(result.coverage, CoverageStatus::GeneralGuidance);
        assert_eq!(result.result.final_score, 5);
        assert_eq!(result.result.confidence, Confidence::Low);
        assert_eq!(result.traffic_light, TrafficLight::Yellow);
    }

    #[test]
    fn test_abbreviation_coverage() {
        let mut scenario = back_pain(45, "3 days", Modality::Mri);
        scenario.chief_complaint = "LBP".to_string();
        let result = evaluate(&scenario);
        assert_eq!(result.topic, Topic::LowBackPain);
        assert_eq!(result.coverage, CoverageStatus::SimilarMatch);
    }

    #[test]
    fn test_pregnancy_warning_surfaces() {
        let mut scenario = back_pain(30, "2 weeks", Modality::Ct);
        scenario.sex = "female".to_string();
        scenario.pregnancy_status = Some(PregnancyStatus::Pregnant);

        let result = evaluate(&scenario);
        assert!(result.has_critical_warning());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.field == "pregnancyStatus"));
    }

    #[test]
    fn test_evidence_sources_match_explanation() {
        let result = evaluate(&back_pain(45, "3 days", Modality::Ct));
        assert_eq!(result.result.evidence_sources, result.explanation.citations);
        assert!(!result.result.evidence_sources.is_empty());
    }

    #[test]
    fn test_evaluate_input_reports_missing_fields() {
        let input = ScenarioInput {
            patient_age: Some(40),
            chief_complaint: Some("Headache".to_string()),
            ..Default::default()
        };
        let err = evaluate_input(&input).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::MissingFields(vec![
                "sex".to_string(),
                "duration".to_string(),
                "proposedImaging".to_string(),
            ])
        );
    }

    #[test]
    fn test_evaluate_input_accepts_complete_payload() {
        let input = ScenarioInput::from(back_pain(45, "3 days", Modality::Mri));
        let result = evaluate_input(&input).unwrap();
        assert_eq!(result.result.final_score, 1);
    }

    struct Runaway;

    impl Scorer for Runaway {
        fn topic(&self) -> Topic {
            Topic::LowBackPain
        }

        fn score(&self, _ctx: &ScoringContext<'_>, baseline: f64) -> TopicScore {
            let factors = vec![ClinicalFactor::new(
                "runaway",
                "Runaway",
                15.0,
                "large weight".to_string(),
                "none",
            )];
            TopicScore {
                raw_score: baseline + 15.0,
                factors,
            }
        }
    }

    #[test]
    fn test_custom_scorer_cannot_leave_scale() {
        let registry = ScorerRegistry::standard().register(Box::new(Runaway));
        let engine = Engine::new().with_registry(registry);

        let mut scenario = back_pain(62, "unsure", Modality::Mri);
        scenario.red_flags.cancer_history = true;
        scenario.red_flags.neuro_deficit = true;
        let result = engine.evaluate(&scenario);

        assert_eq!(result.result.final_score, 9);
        assert_eq!(result.result.baseline_score, 5.0);
        assert!(result.explanation.clamped);
    }

    #[test]
    fn test_blank_text_still_scores() {
        let mut scenario = back_pain(45, "   ", Modality::Mri);
        scenario.sex = "".to_string();
        let result = evaluate(&scenario);
        assert!((1..=9).contains(&result.result.final_score));
        assert!(result.warnings.iter().any(|w| w.field == "sex"));
    }
}
