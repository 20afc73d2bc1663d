use serde::Serialize;

use crate::scenario::text::mentions;
use crate::scenario::{ClinicalScenario, Modality, NormalizedDuration, RedFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Supports,
    Opposes,
    Neutral,
}

impl Direction {
    pub fn from_contribution(contribution: f64) -> Self {
        if contribution > 0.0 {
            Direction::Supports
        } else if contribution < 0.0 {
            Direction::Opposes
        } else {
            Direction::Neutral
        }
    }
}

/// One fired rule's contribution to the score.
///
/// Fields are private so the direction always agrees with the sign of the
/// contribution; values are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalFactor {
    id: String,
    name: String,
    contribution: f64,
    direction: Direction,
    explanation: String,
    citation: String,
}

impl ClinicalFactor {
    pub fn new(id: &str, name: &str, contribution: f64, explanation: String, citation: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            contribution,
            direction: Direction::from_contribution(contribution),
            explanation,
            citation: citation.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contribution(&self) -> f64 {
        self.contribution
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn citation(&self) -> &str {
        &self.citation
    }
}

/// Everything a rule may look at, computed once per evaluation
#[derive(Debug, Clone)]
pub struct ScoringContext<'a> {
    pub scenario: &'a ClinicalScenario,
    pub duration: &'a NormalizedDuration,
    /// Checkbox flags plus flags implied by age
    pub red_flags: RedFlags,
    /// Lower-cased complaint, history and symptoms
    pub text: String,
}

impl<'a> ScoringContext<'a> {
    pub fn new(scenario: &'a ClinicalScenario, duration: &'a NormalizedDuration) -> Self {
        Self {
            scenario,
            duration,
            red_flags: scenario.effective_red_flags(),
            text: scenario.clinical_text(),
        }
    }

    /// Whether any term appears in the clinical text outside a negated clause
    pub fn mentions_any(&self, terms: &[&str]) -> bool {
        terms.iter().any(|t| mentions(&self.text, t))
    }

    pub fn modality(&self) -> &Modality {
        &self.scenario.proposed_imaging.modality
    }

    pub fn is_pregnant_ct(&self) -> bool {
        self.scenario.is_pregnant() && *self.modality() == Modality::Ct
    }

    pub fn is_pediatric(&self) -> bool {
        self.red_flags.age_under_18
    }
}

/// An evidence-weighted scoring rule.
///
/// Rules are plain data: a fixed weight and citation plus a predicate and an
/// explanation function over the [`ScoringContext`].
#[derive(Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub name: &'static str,
    pub weight: f64,
    pub citation: &'static str,
    pub applies: fn(&ScoringContext<'_>) -> bool,
    pub explain: fn(&ScoringContext<'_>) -> String,
}

impl Rule {
    /// The factor this rule contributes, if it fires
    pub fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<ClinicalFactor> {
        if !(self.applies)(ctx) {
            return None;
        }
        tracing::trace!(rule = self.id, weight = self.weight, "rule fired");
        Some(ClinicalFactor::new(
            self.id,
            self.name,
            self.weight,
            (self.explain)(ctx),
            self.citation,
        ))
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("weight", &self.weight)
            .finish()
    }
}
