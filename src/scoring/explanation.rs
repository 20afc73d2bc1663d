//! Per-rule contribution breakdown and the human-readable summary.

use serde::Serialize;

use super::alternatives::Alternative;
use super::engine::{AggregateScore, Category, FactorContribution};
use super::factors::ClinicalFactor;
use super::topics::Topic;
use crate::scenario::ProposedImaging;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub baseline: f64,
    pub raw_score: f64,
    pub final_score: u8,
    pub clamped: bool,
    pub contributions: Vec<FactorContribution>,
    /// Distinct citations in first-use order
    pub citations: Vec<String>,
    pub summary: String,
}

fn distinct_citations(factors: &[ClinicalFactor]) -> Vec<String> {
    let mut citations: Vec<String> = Vec::new();
    for factor in factors {
        if !citations.iter().any(|c| c == factor.citation()) {
            citations.push(factor.citation().to_string());
        }
    }
    citations
}

fn summarize(topic: Topic, factors: &[ClinicalFactor], score: &AggregateScore) -> String {
    let mut summary = format!(
        "{} ({}/9) under {} guidance.",
        score.category.label(),
        score.final_score,
        topic.label().to_lowercase()
    );

    if factors.is_empty() {
        summary.push_str(" No specific factors applied; the score stays at baseline.");
        return summary;
    }

    let supporting: Vec<&str> = factors
        .iter()
        .filter(|f| f.contribution() > 0.0)
        .map(ClinicalFactor::name)
        .collect();
    let opposing: Vec<&str> = factors
        .iter()
        .filter(|f| f.contribution() < 0.0)
        .map(ClinicalFactor::name)
        .collect();

    if !supporting.is_empty() {
        summary.push_str(&format!(" Supporting: {}.", supporting.join(", ")));
    }
    if !opposing.is_empty() {
        summary.push_str(&format!(" Opposing: {}.", opposing.join(", ")));
    }
    if score.was_clamped() {
        summary.push_str(&format!(
            " Raw score {:.1} was clamped to {}.",
            score.raw_score, score.final_score
        ));
    }
    summary
}

pub fn build_explanation(
    topic: Topic,
    factors: &[ClinicalFactor],
    score: &AggregateScore,
) -> Explanation {
    Explanation {
        baseline: score.breakdown.base_score,
        raw_score: score.raw_score,
        final_score: score.final_score,
        clamped: score.was_clamped(),
        contributions: score.breakdown.factors.clone(),
        citations: distinct_citations(factors),
        summary: summarize(topic, factors, score),
    }
}

/// One-sentence recommendation for the requested study
pub fn recommendation(
    imaging: &ProposedImaging,
    category: Category,
    alternatives: &[Alternative],
) -> String {
    let study = imaging.describe();
    match category {
        Category::Appropriate => {
            format!("{} is usually appropriate for this presentation.", study)
        }
        Category::Uncertain => format!(
            "{} may be appropriate; weigh the contributing factors before ordering.",
            study
        ),
        Category::Inappropriate => match alternatives.first() {
            Some(alternative) => format!(
                "{} is usually not appropriate; consider {} instead.",
                study,
                alternative.procedure.to_lowercase()
            ),
            None => format!("{} is usually not appropriate for this presentation.", study),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Modality;
    use crate::scoring::alternatives::generate_alternatives;
    use crate::scoring::engine::aggregate;
    use crate::scoring::topics::TopicScore;

    fn factor(name: &str, contribution: f64, citation: &str) -> ClinicalFactor {
        ClinicalFactor::new("f", name, contribution, "because".to_string(), citation)
    }

    fn explain(factors: Vec<ClinicalFactor>) -> Explanation {
        let raw_score = factors.iter().fold(5.0, |s, f| s + f.contribution());
        let topic_score = TopicScore { raw_score, factors };
        let score = aggregate(&topic_score);
        build_explanation(Topic::LowBackPain, &topic_score.factors, &score)
    }

    #[test]
    fn test_citations_are_deduplicated_in_order() {
        let explanation = explain(vec![
            factor("A", 1.0, "Chou 2011"),
            factor("B", 1.0, "ACR"),
            factor("C", -1.0, "Chou 2011"),
        ]);
        assert_eq!(explanation.citations, vec!["Chou 2011", "ACR"]);
        assert_eq!(explanation.contributions.len(), 3);
    }

    #[test]
    fn test_summary_lists_supporting_and_opposing() {
        let explanation = explain(vec![
            factor("Cancer history", 3.0, "x"),
            factor("Acute duration", -2.0, "y"),
        ]);
        assert!(explanation.summary.starts_with("May be appropriate (6/9)"));
        assert!(explanation.summary.contains("Supporting: Cancer history."));
        assert!(explanation.summary.contains("Opposing: Acute duration."));
        assert!(!explanation.clamped);
    }

    #[test]
    fn test_summary_mentions_clamping() {
        let explanation = explain(vec![
            factor("Cancer history", 3.0, "x"),
            factor("Neurological deficit", 2.5, "x"),
            factor("Age over 50", 1.0, "x"),
        ]);
        assert!(explanation.clamped);
        assert!(explanation.summary.contains("Raw score 11.5 was clamped to 9."));
    }

    #[test]
    fn test_empty_explanation() {
        let explanation = explain(vec![]);
        assert!(explanation.summary.contains("stays at baseline"));
        assert!(explanation.citations.is_empty());
    }

    #[test]
    fn test_recommendation_points_to_first_alternative() {
        let imaging = ProposedImaging::new(Modality::Ct, "lumbar spine", "back pain");
        let alternatives = generate_alternatives(&imaging, 1);

        let text = recommendation(&imaging, Category::Inappropriate, &alternatives);
        assert_eq!(
            text,
            "CT lumbar spine is usually not appropriate; consider conservative management / observation instead."
        );

        let text = recommendation(&imaging, Category::Appropriate, &[]);
        assert!(text.contains("usually appropriate"));
    }
}
