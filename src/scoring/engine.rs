use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::{
    APPROPRIATE_MIN, BASELINE_SCORE, DECISIVE_CONTRIBUTION, HIGH_CONFIDENCE_FACTORS,
    INAPPROPRIATE_MAX, MAX_SCORE, MIN_SCORE,
};
use super::factors::ClinicalFactor;
use super::topics::TopicScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Appropriate,
    Uncertain,
    Inappropriate,
}

impl Category {
    pub fn from_score(score: u8) -> Self {
        if score >= APPROPRIATE_MIN {
            Category::Appropriate
        } else if score <= INAPPROPRIATE_MAX {
            Category::Inappropriate
        } else {
            Category::Uncertain
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Appropriate => "Usually appropriate",
            Category::Uncertain => "May be appropriate",
            Category::Inappropriate => "Usually not appropriate",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorContribution {
    pub label: String,       // factor name, e.g. "Cancer history"
    pub description: String, // e.g. "+3.0: History of malignancy ..."
    pub before: f64,         // Score before this factor
    pub after: f64,          // Score after this factor
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub base_score: f64,
    pub factors: Vec<FactorContribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateScore {
    pub raw_score: f64,
    pub final_score: u8,
    pub category: Category,
    pub confidence: Confidence,
    pub breakdown: ScoreBreakdown,
}

impl AggregateScore {
    /// Whether clamping moved the score outside rounding distance
    pub fn was_clamped(&self) -> bool {
        (self.raw_score - f64::from(self.final_score)).abs() > 0.5
    }
}

/// Clamp to 1..=9, then round half up.
///
/// Clamping happens first so out-of-range sums land exactly on a bound.
pub fn clamp_and_round(raw: f64) -> u8 {
    let clamped = raw.clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE));
    (clamped + 0.5).floor() as u8
}

pub fn confidence_for(factors: &[ClinicalFactor]) -> Confidence {
    let decisive = factors
        .iter()
        .any(|f| f.contribution().abs() >= DECISIVE_CONTRIBUTION);

    if factors.len() >= HIGH_CONFIDENCE_FACTORS || decisive {
        Confidence::High
    } else if factors.is_empty() {
        Confidence::Low
    } else {
        Confidence::Moderate
    }
}

/// Replay the factors from the baseline, recording the running score
pub fn breakdown(factors: &[ClinicalFactor], baseline: f64) -> ScoreBreakdown {
    let mut score = baseline;
    let factors = factors
        .iter()
        .map(|factor| {
            let before = score;
            score += factor.contribution();
            FactorContribution {
                label: factor.name().to_string(),
                description: format!("{:+.1}: {}", factor.contribution(), factor.explanation()),
                before,
                after: score,
            }
        })
        .collect();

    ScoreBreakdown {
        base_score: baseline,
        factors,
    }
}

pub fn aggregate(topic_score: &TopicScore) -> AggregateScore {
    let final_score = clamp_and_round(topic_score.raw_score);
    let category = Category::from_score(final_score);
    let confidence = confidence_for(&topic_score.factors);

    tracing::debug!(
        raw_score = topic_score.raw_score,
        final_score,
        ?category,
        ?confidence,
        "aggregated score"
    );

    AggregateScore {
        raw_score: topic_score.raw_score,
        final_score,
        category,
        confidence,
        breakdown: breakdown(&topic_score.factors, BASELINE_SCORE),
    }
}
