//! Topic scorers and the registry that maps a [`Topic`] to its scorer.
//!
//! Each topic is an ordered list of [`Rule`]s. Rules are not mutually
//! exclusive: every rule is checked and the raw score is the baseline plus
//! the sum of all fired contributions.

pub mod abdominal_pain;
pub mod generic;
pub mod headache;
pub mod low_back_pain;

use serde::{Deserialize, Serialize};
use std::fmt;

use super::factors::{ClinicalFactor, Rule, ScoringContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    LowBackPain,
    Headache,
    AbdominalPain,
    Generic,
}

impl Topic {
    pub fn label(&self) -> &'static str {
        match self {
            Topic::LowBackPain => "Low back pain",
            Topic::Headache => "Headache",
            Topic::AbdominalPain => "Abdominal pain",
            Topic::Generic => "General imaging guidance",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw output of a topic scorer, before clamping and rounding
#[derive(Debug, Clone, PartialEq)]
pub struct TopicScore {
    pub raw_score: f64,
    pub factors: Vec<ClinicalFactor>,
}

/// Common interface for topic scorers
pub trait Scorer: Send + Sync {
    fn topic(&self) -> Topic;

    fn score(&self, ctx: &ScoringContext<'_>, baseline: f64) -> TopicScore;
}

/// Scorer driven by a static rule table.
///
/// `fallback` is consulted only when none of `rules` fired.
#[derive(Debug, Clone, Copy)]
pub struct RuleScorer {
    pub topic: Topic,
    pub rules: &'static [Rule],
    pub fallback: Option<Rule>,
}

impl Scorer for RuleScorer {
    fn topic(&self) -> Topic {
        self.topic
    }

    fn score(&self, ctx: &ScoringContext<'_>, baseline: f64) -> TopicScore {
        let mut factors: Vec<ClinicalFactor> =
            self.rules.iter().filter_map(|rule| rule.evaluate(ctx)).collect();

        if factors.is_empty() {
            if let Some(fallback) = &self.fallback {
                factors.extend(fallback.evaluate(ctx));
            }
        }

        let raw_score = factors
            .iter()
            .fold(baseline, |score, factor| score + factor.contribution());

        tracing::debug!(
            topic = %self.topic,
            fired = factors.len(),
            raw_score,
            "topic scored"
        );

        TopicScore { raw_score, factors }
    }
}

/// Topic-to-scorer mapping with a mandatory fallback scorer
pub struct ScorerRegistry {
    scorers: Vec<Box<dyn Scorer>>,
    fallback: Box<dyn Scorer>,
}

impl ScorerRegistry {
    pub fn new(fallback: Box<dyn Scorer>) -> Self {
        Self {
            scorers: Vec::new(),
            fallback,
        }
    }

    /// Register a scorer, replacing any existing scorer for the same topic
    pub fn register(mut self, scorer: Box<dyn Scorer>) -> Self {
        self.scorers.retain(|s| s.topic() != scorer.topic());
        self.scorers.push(scorer);
        self
    }

    /// The built-in low-back-pain, headache and abdominal-pain scorers with
    /// the generic scorer as fallback
    pub fn standard() -> Self {
        Self::new(Box::new(generic::SCORER))
            .register(Box::new(low_back_pain::SCORER))
            .register(Box::new(headache::SCORER))
            .register(Box::new(abdominal_pain::SCORER))
    }

    /// Scorer for `topic`, or the fallback when none is registered
    pub fn scorer_for(&self, topic: Topic) -> &dyn Scorer {
        self.scorers
            .iter()
            .find(|s| s.topic() == topic)
            .map(|s| s.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }
}

impl Default for ScorerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
