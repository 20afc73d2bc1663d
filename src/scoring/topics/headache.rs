use super::{RuleScorer, Topic};
use crate::scenario::DurationPattern;
use crate::scoring::factors::{Rule, ScoringContext};

/// Headaches present at least this long without change count as chronic
pub const CHRONIC_WEEKS: f64 = 12.0;

const ACR_HEADACHE: &str = "ACR Appropriateness Criteria: Headache (2022)";
const PERRY_2013: &str =
    "Perry JJ, et al. Validation of the Ottawa Subarachnoid Hemorrhage Rule in patients with acute headache. JAMA. 2013;310(12):1248-1255";
const DO_2019: &str =
    "Do TP, et al. Red and orange flags for secondary headaches in clinical practice: SNNOOP10 list. Neurology. 2019;92(3):134-144";

const THUNDERCLAP_TERMS: &[&str] = &[
    "thunderclap",
    "worst headache",
    "sudden onset",
    "sudden severe",
];
const NEW_HEADACHE_TERMS: &[&str] = &["new headache", "new onset", "new-onset", "first headache"];
const CHANGE_TERMS: &[&str] = &[
    "change in pattern",
    "changed pattern",
    "different from usual",
    "worsening",
];

fn is_thunderclap(ctx: &ScoringContext<'_>) -> bool {
    ctx.red_flags.sudden_onset || ctx.mentions_any(THUNDERCLAP_TERMS)
}

fn is_new_headache(ctx: &ScoringContext<'_>) -> bool {
    (ctx.duration.is_known() && ctx.duration.weeks < CHRONIC_WEEKS)
        || ctx.mentions_any(NEW_HEADACHE_TERMS)
}

/// Anything that turns a long-standing headache into a new problem
fn has_new_features(ctx: &ScoringContext<'_>) -> bool {
    let f = &ctx.red_flags;
    is_thunderclap(ctx)
        || f.neuro_deficit
        || f.progressive_symptoms
        || f.fever
        || f.cancer_history
        || f.immunocompromised
        || ctx.duration.pattern == DurationPattern::Progressive
        || ctx.mentions_any(CHANGE_TERMS)
}

pub const RULES: &[Rule] = &[
    Rule {
        id: "headache-thunderclap",
        name: "Thunderclap onset",
        weight: 4.0,
        citation: PERRY_2013,
        applies: is_thunderclap,
        explain: |_| {
            "Sudden severe onset requires exclusion of subarachnoid hemorrhage".to_string()
        },
    },
    Rule {
        id: "headache-chronic-stable",
        name: "Chronic stable pattern",
        weight: -2.5,
        citation: ACR_HEADACHE,
        applies: |ctx| {
            ctx.duration.is_known()
                && ctx.duration.weeks >= CHRONIC_WEEKS
                && !has_new_features(ctx)
        },
        explain: |ctx| {
            format!(
                "Headache present for {:.0} weeks without new features; imaging rarely changes management",
                ctx.duration.weeks
            )
        },
    },
    Rule {
        id: "headache-neuro-deficit",
        name: "Neurological deficit",
        weight: 3.0,
        citation: ACR_HEADACHE,
        applies: |ctx| ctx.red_flags.neuro_deficit,
        explain: |_| "Focal neurological findings suggest a structural lesion".to_string(),
    },
    Rule {
        id: "headache-new-over-50",
        name: "New headache over 50",
        weight: 1.5,
        citation: DO_2019,
        applies: |ctx| ctx.red_flags.age_over_50 && is_new_headache(ctx),
        explain: |ctx| {
            format!(
                "New headache at age {} raises concern for secondary causes such as giant cell arteritis",
                ctx.scenario.patient_age
            )
        },
    },
    Rule {
        id: "headache-cancer-history",
        name: "Cancer history",
        weight: 2.0,
        citation: DO_2019,
        applies: |ctx| ctx.red_flags.cancer_history,
        explain: |_| "History of malignancy raises concern for intracranial metastasis".to_string(),
    },
    Rule {
        id: "headache-immunocompromised",
        name: "Immunocompromised",
        weight: 1.5,
        citation: DO_2019,
        applies: |ctx| ctx.red_flags.immunocompromised,
        explain: |_| {
            "Immunosuppression raises concern for opportunistic infection or lymphoma".to_string()
        },
    },
];

pub const SCORER: RuleScorer = RuleScorer {
    topic: Topic::Headache,
    rules: RULES,
    fallback: None,
};
