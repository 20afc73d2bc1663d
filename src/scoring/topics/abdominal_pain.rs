use super::{RuleScorer, Topic};
use crate::scenario::Modality;
use crate::scoring::factors::Rule;

const ACR_RLQ: &str = "ACR Appropriateness Criteria: Right Lower Quadrant Pain (2022)";
const ACR_FEVER: &str =
    "ACR Appropriateness Criteria: Acute Nonlocalized Abdominal Pain (2018)";
const ACR_PEDIATRIC: &str =
    "ACR Appropriateness Criteria: Suspected Appendicitis-Child (2018)";
const ACR_PREGNANCY: &str =
    "ACR-SPR Practice Parameter for Imaging Pregnant or Potentially Pregnant Patients with Ionizing Radiation (2023)";

const APPENDICITIS_TERMS: &[&str] = &[
    "appendicitis",
    "rlq",
    "right lower quadrant",
    "mcburney",
    "periumbilical pain migrat",
    "rebound",
];

pub const RULES: &[Rule] = &[
    Rule {
        id: "abdominal-appendicitis",
        name: "Suspected appendicitis",
        weight: 1.5,
        citation: ACR_RLQ,
        applies: |ctx| ctx.mentions_any(APPENDICITIS_TERMS),
        explain: |_| "Presentation is consistent with possible appendicitis".to_string(),
    },
    Rule {
        id: "abdominal-fever",
        name: "Fever",
        weight: 2.0,
        citation: ACR_FEVER,
        applies: |ctx| ctx.red_flags.fever,
        explain: |_| "Fever with abdominal pain suggests an infectious or inflammatory process".to_string(),
    },
    Rule {
        id: "abdominal-pediatric-ultrasound",
        name: "Pediatric ultrasound",
        weight: 1.0,
        citation: ACR_PEDIATRIC,
        applies: |ctx| ctx.is_pediatric() && *ctx.modality() == Modality::Ultrasound,
        explain: |_| "Ultrasound is the preferred first study in children".to_string(),
    },
    Rule {
        id: "abdominal-pediatric-ct",
        name: "Pediatric CT",
        weight: -0.5,
        citation: ACR_PEDIATRIC,
        applies: |ctx| ctx.is_pediatric() && *ctx.modality() == Modality::Ct,
        explain: |_| "Children are more sensitive to radiation; consider ultrasound first".to_string(),
    },
    Rule {
        id: "abdominal-pregnancy-ct",
        name: "Pregnancy with CT",
        weight: -2.5,
        citation: ACR_PREGNANCY,
        applies: |ctx| ctx.is_pregnant_ct(),
        explain: |_| "Ultrasound or MRI is preferred during pregnancy".to_string(),
    },
    Rule {
        id: "abdominal-immunocompromised",
        name: "Immunocompromised",
        weight: 1.5,
        citation: ACR_FEVER,
        applies: |ctx| ctx.red_flags.immunocompromised,
        explain: |_| "Immunosuppression can mask peritoneal signs".to_string(),
    },
];

/// Keeps the explanation non-empty when red flags exist but no specific
/// rule fired
pub const RED_FLAG_FALLBACK: Rule = Rule {
    id: "abdominal-red-flags",
    name: "Red Flags",
    weight: 1.5,
    citation: ACR_FEVER,
    applies: |ctx| ctx.red_flags.any(),
    explain: |ctx| format!("Red flags present: {}", ctx.red_flags.present().join(", ")),
};

pub const SCORER: RuleScorer = RuleScorer {
    topic: Topic::AbdominalPain,
    rules: RULES,
    fallback: Some(RED_FLAG_FALLBACK),
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{
        normalize_duration, ClinicalScenario, PregnancyStatus, ProposedImaging,
    };
    use crate::scoring::factors::ScoringContext;
    use crate::scoring::topics::Scorer;

    fn abdominal(age: u32, modality: Modality) -> ClinicalScenario {
        ClinicalScenario::new(
            age,
            "female",
            "Abdominal pain",
            "1 day",
            ProposedImaging::new(modality, "abdomen and pelvis", "abdominal pain"),
        )
    }

    fn fired(scenario: &ClinicalScenario) -> (f64, Vec<String>) {
        let duration = normalize_duration(&scenario.duration);
        let ctx = ScoringContext::new(scenario, &duration);
        let result = SCORER.score(&ctx, 5.0);
        let ids = result.factors.iter().map(|f| f.id().to_string()).collect();
        (result.raw_score, ids)
    }

    #[test]
    fn test_appendicitis_with_fever() {
        let mut s = abdominal(25, Modality::Ct);
        s.clinical_history = "Pain migrated to the right lower quadrant".to_string();
        s.red_flags.fever = true;
        let (raw, ids) = fired(&s);
        assert_eq!(ids, vec!["abdominal-appendicitis", "abdominal-fever"]);
        assert_eq!(raw, 8.5);
    }

    #[test]
    fn test_pediatric_modality_preference() {
        let (_, ids) = fired(&abdominal(8, Modality::Ultrasound));
        assert_eq!(ids, vec!["abdominal-pediatric-ultrasound"]);

        let (raw, ids) = fired(&abdominal(8, Modality::Ct));
        assert_eq!(ids, vec!["abdominal-pediatric-ct"]);
        assert_eq!(raw, 4.5);
    }

    #[test]
    fn test_pregnancy_with_ct() {
        let mut s = abdominal(29, Modality::Ct);
        s.pregnancy_status = Some(PregnancyStatus::Pregnant);
        let (raw, ids) = fired(&s);
        assert_eq!(ids, vec!["abdominal-pregnancy-ct"]);
        assert_eq!(raw, 2.5);
    }

    #[test]
    fn test_fallback_when_only_unscored_flags_present() {
        let mut s = abdominal(40, Modality::Ct);
        s.red_flags.weight_loss = true;
        let duration = normalize_duration(&s.duration);
        let ctx = ScoringContext::new(&s, &duration);
        let result = SCORER.score(&ctx, 5.0);

        assert_eq!(result.factors.len(), 1);
        assert_eq!(result.factors[0].name(), "Red Flags");
        assert!(result.factors[0].explanation().contains("unexplained weight loss"));
        assert_eq!(result.raw_score, 6.5);
    }

    #[test]
    fn test_fallback_counts_age_flag() {
        let (_, ids) = fired(&abdominal(70, Modality::Ct));
        assert_eq!(ids, vec!["abdominal-red-flags"]);
    }

    #[test]
    fn test_no_flags_no_factors() {
        let (raw, ids) = fired(&abdominal(40, Modality::Ct));
        assert!(ids.is_empty());
        assert_eq!(raw, 5.0);
    }

    #[test]
    fn test_fallback_skipped_when_a_rule_fired() {
        let mut s = abdominal(70, Modality::Ct);
        s.red_flags.fever = true;
        let (_, ids) = fired(&s);
        assert_eq!(ids, vec!["abdominal-fever"]);
    }
}
