use super::{RuleScorer, Topic};
use crate::scoring::factors::{Rule, ScoringContext};

/// Symptoms shorter than this are considered acute
pub const ACUTE_WEEKS: f64 = 6.0;

const ACR_LBP: &str = "ACR Appropriateness Criteria: Low Back Pain (2021)";
const CHOU_2011: &str =
    "Chou R, et al. Diagnostic imaging for low back pain: advice for high-value health care. Ann Intern Med. 2011;154(3):181-189";
const CHOU_2009: &str =
    "Chou R, et al. Imaging strategies for low-back pain: systematic review and meta-analysis. Lancet. 2009;373(9662):463-472";
const ACR_PREGNANCY: &str =
    "ACR-SPR Practice Parameter for Imaging Pregnant or Potentially Pregnant Patients with Ionizing Radiation (2023)";

const CONSERVATIVE_TERMS: &[&str] = &[
    "physical therapy",
    "physiotherapy",
    "nsaid",
    "ibuprofen",
    "naproxen",
    "chiropract",
    "conservative",
    "home exercise",
];

/// Flags other than age that make the presentation complicated
fn has_serious_flags(ctx: &ScoringContext<'_>) -> bool {
    let f = &ctx.red_flags;
    f.cancer_history
        || f.neuro_deficit
        || f.fever
        || f.weight_loss
        || f.trauma
        || f.immunocompromised
        || f.iv_drug_use
        || f.bladder_bowel_dysfunction
        || f.progressive_symptoms
}

fn conservative_tried(ctx: &ScoringContext<'_>) -> bool {
    ctx.scenario
        .conservative_therapy_tried
        .unwrap_or_else(|| ctx.mentions_any(CONSERVATIVE_TERMS))
}

pub const RULES: &[Rule] = &[
    Rule {
        id: "lbp-acute-duration",
        name: "Acute duration",
        weight: -2.0,
        citation: CHOU_2011,
        applies: |ctx| ctx.duration.is_known() && ctx.duration.weeks < ACUTE_WEEKS,
        explain: |ctx| {
            format!(
                "Symptoms for {:.1} weeks, inside the {ACUTE_WEEKS}-week window in which most low back pain resolves",
                ctx.duration.weeks
            )
        },
    },
    Rule {
        id: "lbp-chronic-duration",
        name: "Persistent symptoms",
        weight: 0.5,
        citation: ACR_LBP,
        applies: |ctx| ctx.duration.is_known() && ctx.duration.weeks >= ACUTE_WEEKS,
        explain: |ctx| {
            format!(
                "Symptoms for {:.1} weeks, beyond the {ACUTE_WEEKS}-week window for uncomplicated pain",
                ctx.duration.weeks
            )
        },
    },
    Rule {
        id: "lbp-cancer-history",
        name: "Cancer history",
        weight: 3.0,
        citation: CHOU_2009,
        applies: |ctx| ctx.red_flags.cancer_history,
        explain: |_| "History of malignancy raises concern for spinal metastasis".to_string(),
    },
    Rule {
        id: "lbp-neuro-deficit",
        name: "Neurological deficit",
        weight: 2.5,
        citation: ACR_LBP,
        applies: |ctx| ctx.red_flags.neuro_deficit,
        explain: |_| {
            "Objective neurological deficit suggests nerve root or cord compression".to_string()
        },
    },
    Rule {
        id: "lbp-age-over-50",
        name: "Age over 50",
        weight: 1.0,
        citation: CHOU_2011,
        applies: |ctx| ctx.red_flags.age_over_50,
        explain: |ctx| {
            format!(
                "Patient age {} increases the prior probability of serious pathology",
                ctx.scenario.patient_age
            )
        },
    },
    Rule {
        id: "lbp-no-conservative-management",
        name: "Conservative management not tried",
        weight: -1.5,
        citation: CHOU_2011,
        applies: |ctx| !has_serious_flags(ctx) && !conservative_tried(ctx),
        explain: |_| {
            "No trial of conservative therapy (activity, NSAIDs, physical therapy) documented"
                .to_string()
        },
    },
    Rule {
        id: "lbp-no-red-flags",
        name: "No red flags",
        weight: -1.0,
        citation: ACR_LBP,
        applies: |ctx| !ctx.red_flags.any(),
        explain: |_| "No red flags for serious underlying pathology".to_string(),
    },
    Rule {
        id: "lbp-pregnancy-ct",
        name: "Pregnancy with CT",
        weight: -3.0,
        citation: ACR_PREGNANCY,
        applies: |ctx| ctx.is_pregnant_ct(),
        explain: |_| {
            "CT exposes the fetus to ionizing radiation; MRI without contrast is preferred".to_string()
        },
    },
    Rule {
        id: "lbp-bladder-bowel",
        name: "Bladder or bowel dysfunction",
        weight: 3.0,
        citation: ACR_LBP,
        applies: |ctx| ctx.red_flags.bladder_bowel_dysfunction,
        explain: |_| "Bladder or bowel dysfunction raises concern for cauda equina syndrome".to_string(),
    },
    Rule {
        id: "lbp-infection-risk",
        name: "Fever with infection risk",
        weight: 2.0,
        citation: CHOU_2009,
        applies: |ctx| {
            ctx.red_flags.fever && (ctx.red_flags.iv_drug_use || ctx.red_flags.immunocompromised)
        },
        explain: |_| {
            "Fever with IV drug use or immunosuppression raises concern for spinal infection"
                .to_string()
        },
    },
    Rule {
        id: "lbp-trauma-older-adult",
        name: "Trauma in older adult",
        weight: 1.5,
        citation: ACR_LBP,
        applies: |ctx| ctx.red_flags.trauma && ctx.red_flags.age_over_50,
        explain: |_| "Trauma over age 50 carries a higher fracture risk".to_string(),
    },
];

pub const SCORER: RuleScorer = RuleScorer {
    topic: Topic::LowBackPain,
    rules: RULES,
    fallback: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{
        normalize_duration, ClinicalScenario, Modality, PregnancyStatus, ProposedImaging,
    };
    use crate::scoring::factors::Direction;
    use crate::scoring::topics::Scorer;

    fn scenario(age: u32, duration: &str, modality: Modality) -> ClinicalScenario {
        ClinicalScenario::new(
            age,
            "male",
            "Lower back pain",
            duration,
            ProposedImaging::new(modality, "lumbar spine", "back pain"),
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
    fn test_uncomplicated_acute_pain() {
        let (raw, ids) = fired(&scenario(45, "3 days", Modality::Mri));
        assert_eq!(
            ids,
            vec![
                "lbp-acute-duration",
                "lbp-no-conservative-management",
                "lbp-no-red-flags"
            ]
        );
        assert!((raw - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_cancer_and_neuro_in_older_adult() {
        let mut s = scenario(62, "unsure", Modality::Mri);
        s.sex = "female".to_string();
        s.red_flags.cancer_history = true;
        s.red_flags.neuro_deficit = true;
        let (raw, ids) = fired(&s);
        assert_eq!(
            ids,
            vec!["lbp-cancer-history", "lbp-neuro-deficit", "lbp-age-over-50"]
        );
        assert!((raw - 11.5).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_duration_contributes_nothing() {
        let (_, ids) = fired(&scenario(45, "", Modality::Mri));
        assert!(!ids.iter().any(|id| id.ends_with("-duration")));
    }

    #[test]
    fn test_chronic_duration() {
        let (_, ids) = fired(&scenario(45, "3 months", Modality::Mri));
        assert!(ids.contains(&"lbp-chronic-duration".to_string()));
        assert!(!ids.contains(&"lbp-acute-duration".to_string()));
    }

    #[test]
    fn test_conservative_therapy_documented() {
        let mut s = scenario(45, "3 days", Modality::Mri);
        s.clinical_history = "Two weeks of ibuprofen without relief".to_string();
        let (_, ids) = fired(&s);
        assert!(!ids.contains(&"lbp-no-conservative-management".to_string()));

        let mut s = scenario(45, "3 days", Modality::Mri);
        s.conservative_therapy_tried = Some(true);
        let (_, ids) = fired(&s);
        assert!(!ids.contains(&"lbp-no-conservative-management".to_string()));
    }

    #[test]
    fn test_failed_therapy_counts_as_tried() {
        let mut s = scenario(45, "3 days", Modality::Mri);
        s.clinical_history =
            "No improvement after 6 weeks of physical therapy and ibuprofen".to_string();
        let (raw, ids) = fired(&s);
        assert_eq!(ids, vec!["lbp-acute-duration", "lbp-no-red-flags"]);
        assert_eq!(raw, 2.0);
    }

    #[test]
    fn test_negated_conservative_therapy_still_counts_as_not_tried() {
        let mut s = scenario(45, "3 days", Modality::Mri);
        s.clinical_history = "Has not tried physical therapy".to_string();
        let (_, ids) = fired(&s);
        assert!(ids.contains(&"lbp-no-conservative-management".to_string()));
    }

    #[test]
    fn test_age_flag_suppresses_no_red_flags_rule() {
        let (_, ids) = fired(&scenario(55, "3 days", Modality::Mri));
        assert!(ids.contains(&"lbp-age-over-50".to_string()));
        assert!(!ids.contains(&"lbp-no-red-flags".to_string()));
        // age alone does not make the presentation complicated
        assert!(ids.contains(&"lbp-no-conservative-management".to_string()));
    }

    #[test]
    fn test_pregnancy_with_ct_opposes() {
        let mut s = scenario(30, "2 weeks", Modality::Ct);
        s.sex = "female".to_string();
        s.pregnancy_status = Some(PregnancyStatus::Pregnant);
        let duration = normalize_duration(&s.duration);
        let ctx = ScoringContext::new(&s, &duration);
        let result = SCORER.score(&ctx, 5.0);

        let factor = result
            .factors
            .iter()
            .find(|f| f.id() == "lbp-pregnancy-ct")
            .unwrap();
        assert_eq!(factor.contribution(), -3.0);
        assert_eq!(factor.direction(), Direction::Opposes);
    }

    #[test]
    fn test_supplementary_red_flags() {
        let mut s = scenario(60, "1 week", Modality::Mri);
        s.red_flags.bladder_bowel_dysfunction = true;
        s.red_flags.fever = true;
        s.red_flags.iv_drug_use = true;
        s.red_flags.trauma = true;
        let (_, ids) = fired(&s);
        assert!(ids.contains(&"lbp-bladder-bowel".to_string()));
        assert!(ids.contains(&"lbp-infection-risk".to_string()));
        assert!(ids.contains(&"lbp-trauma-older-adult".to_string()));
        assert!(!ids.contains(&"lbp-no-conservative-management".to_string()));
    }
}
