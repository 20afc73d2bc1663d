//! Scenario input validation.
//!
//! The validator collects findings and never rejects a scenario: every issue
//! is returned to the caller alongside the score. Structural refusal (absent
//! fields) happens earlier, in [`crate::scenario::ScenarioInput::into_scenario`].

use serde::{Deserialize, Serialize};

use super::duration::explicit_weeks;
use super::text::mentions;
use super::types::{ClinicalScenario, ContrastAgent, Modality, PregnancyStatus, RedFlags};
use crate::scoring::{AGE_WARNING_THRESHOLD, MAX_AGE, MIN_AGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    fn new(field: &str, message: String, severity: Severity) -> Self {
        Self {
            field: field.to_string(),
            message,
            severity,
        }
    }
}

/// Free-text vocabulary that implies a red flag
struct KeywordFamily {
    field: &'static str,
    label: &'static str,
    keywords: &'static [&'static str],
    is_set: fn(&RedFlags) -> bool,
}

const KEYWORD_FAMILIES: &[KeywordFamily] = &[
    KeywordFamily {
        field: "redFlags.cancerHistory",
        label: "cancer history",
        keywords: &[
            "cancer",
            "malignan",
            "metasta",
            "carcinoma",
            "tumor",
            "tumour",
            "lymphoma",
            "leukemia",
            "myeloma",
            "oncolog",
        ],
        is_set: |f| f.cancer_history,
    },
    KeywordFamily {
        field: "redFlags.neuroDeficit",
        label: "neurological deficit",
        keywords: &[
            "numbness",
            "weakness",
            "foot drop",
            "paresthesia",
            "tingling",
            "loss of sensation",
            "hemiparesis",
            "slurred speech",
            "vision loss",
            "diplopia",
        ],
        is_set: |f| f.neuro_deficit,
    },
    KeywordFamily {
        field: "redFlags.fever",
        label: "fever",
        keywords: &["fever", "febrile", "pyrexia", "rigors", "chills"],
        is_set: |f| f.fever,
    },
    KeywordFamily {
        field: "redFlags.trauma",
        label: "trauma",
        keywords: &[
            "trauma",
            "fell",
            "fall from",
            "motor vehicle",
            "car accident",
            "injury",
            "injured",
            "assault",
        ],
        is_set: |f| f.trauma,
    },
    KeywordFamily {
        field: "redFlags.weightLoss",
        label: "weight loss",
        keywords: &["weight loss", "lost weight", "losing weight"],
        is_set: |f| f.weight_loss,
    },
    KeywordFamily {
        field: "redFlags.immunocompromised",
        label: "immunocompromise",
        keywords: &[
            "hiv",
            "transplant",
            "immunosuppress",
            "chemotherapy",
            "long-term steroid",
            "chronic steroid",
        ],
        is_set: |f| f.immunocompromised,
    },
    KeywordFamily {
        field: "redFlags.ivDrugUse",
        label: "IV drug use",
        keywords: &["iv drug", "ivdu", "intravenous drug", "injection drug", "heroin"],
        is_set: |f| f.iv_drug_use,
    },
    KeywordFamily {
        field: "redFlags.bladderBowelDysfunction",
        label: "bladder/bowel dysfunction",
        keywords: &[
            "incontinence",
            "urinary retention",
            "bladder dysfunction",
            "bowel dysfunction",
            "saddle anesthesia",
            "saddle anaesthesia",
        ],
        is_set: |f| f.bladder_bowel_dysfunction,
    },
];

const PROCEDURAL_TERMS: &[&str] = &["biopsy", "drainage", "injection", "lumbar puncture", "aspiration"];

/// Prior studies older than this are not considered duplicates
const DUPLICATE_WINDOW_WEEKS: f64 = 26.0;

const METFORMIN_EGFR_CAUTION: f64 = 45.0;

fn check_required_text(scenario: &ClinicalScenario, issues: &mut Vec<ValidationIssue>) {
    let imaging = &scenario.proposed_imaging;
    let required = [
        ("sex", "Sex", scenario.sex.as_str()),
        ("chiefComplaint", "Chief complaint", scenario.chief_complaint.as_str()),
        ("duration", "Symptom duration", scenario.duration.as_str()),
        ("proposedImaging.modality", "Imaging modality", imaging.modality.label()),
        ("proposedImaging.bodyPart", "Body part", imaging.body_part.as_str()),
        ("proposedImaging.indication", "Indication", imaging.indication.as_str()),
    ];

    for (field, label, value) in required {
        if value.trim().is_empty() {
            issues.push(ValidationIssue::new(
                field,
                format!("{} is required", label),
                Severity::Error,
            ));
        }
    }
}

fn check_age(scenario: &ClinicalScenario, issues: &mut Vec<ValidationIssue>) {
    let age = scenario.patient_age;

    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        issues.push(ValidationIssue::new(
            "patientAge",
            format!(
                "Age {} is outside the valid range {}-{}",
                age, MIN_AGE, MAX_AGE
            ),
            Severity::Error,
        ));
    } else if age >= AGE_WARNING_THRESHOLD {
        issues.push(ValidationIssue::new(
            "patientAge",
            format!("Age {} is unusually high; please verify", age),
            Severity::Warning,
        ));
    }

    if scenario.red_flags.age_over_50 && age <= 50 {
        issues.push(ValidationIssue::new(
            "redFlags.ageOver50",
            format!("'Age over 50' is checked but the patient is {}", age),
            Severity::Warning,
        ));
    }
    if scenario.red_flags.age_under_18 && age >= 18 {
        issues.push(ValidationIssue::new(
            "redFlags.ageUnder18",
            format!("'Age under 18' is checked but the patient is {}", age),
            Severity::Warning,
        ));
    }
}

fn check_unflagged_findings(scenario: &ClinicalScenario, issues: &mut Vec<ValidationIssue>) {
    let text = scenario.clinical_text();
    if text.is_empty() {
        return;
    }

    for family in KEYWORD_FAMILIES {
        if (family.is_set)(&scenario.red_flags) {
            continue;
        }
        if let Some(keyword) = family.keywords.iter().find(|k| mentions(&text, k)) {
            issues.push(ValidationIssue::new(
                family.field,
                format!(
                    "History mentions '{}' but the {} red flag is not checked",
                    keyword, family.label
                ),
                Severity::Warning,
            ));
        }
    }
}

fn check_duration_consistency(scenario: &ClinicalScenario, issues: &mut Vec<ValidationIssue>) {
    let text = scenario.duration.trim().to_lowercase();
    let Some(explicit) = explicit_weeks(&text) else {
        return;
    };

    let says_chronic = ["chronic", "long-standing", "longstanding", "long standing"]
        .iter()
        .any(|t| text.contains(t));
    let says_acute = text.contains("acute") && !text.contains("subacute");

    if says_chronic && explicit < 6.0 {
        issues.push(ValidationIssue::new(
            "duration",
            format!(
                "Duration is described as chronic but gives an explicit period of {:.1} weeks",
                explicit
            ),
            Severity::Warning,
        ));
    }
    if says_acute && explicit > 12.0 {
        issues.push(ValidationIssue::new(
            "duration",
            format!(
                "Duration is described as acute but gives an explicit period of {:.1} weeks",
                explicit
            ),
            Severity::Warning,
        ));
    }
}

fn check_pregnancy(scenario: &ClinicalScenario, issues: &mut Vec<ValidationIssue>) {
    let modality = &scenario.proposed_imaging.modality;
    if !modality.uses_ionizing_radiation() {
        return;
    }

    match scenario.pregnancy_status {
        Some(PregnancyStatus::Pregnant) => issues.push(ValidationIssue::new(
            "pregnancyStatus",
            format!(
                "Patient is pregnant and {} uses ionizing radiation; consider ultrasound or MRI without contrast",
                modality
            ),
            Severity::Critical,
        )),
        Some(PregnancyStatus::Possible) => issues.push(ValidationIssue::new(
            "pregnancyStatus",
            format!("Pregnancy is possible; confirm status before {}", modality),
            Severity::Warning,
        )),
        _ => {}
    }
}

fn check_contrast(scenario: &ClinicalScenario, issues: &mut Vec<ValidationIssue>) {
    let imaging = &scenario.proposed_imaging;
    if !imaging.uses_contrast() {
        return;
    }
    let agent = imaging.modality.contrast_agent().unwrap_or(ContrastAgent::Unknown);

    if let Some(allergy) = &scenario.contrast_allergy {
        if allergy.applies_to(agent) {
            let reaction = allergy
                .reaction
                .as_deref()
                .map(|r| format!(" (prior reaction: {})", r))
                .unwrap_or_default();
            issues.push(ValidationIssue::new(
                "contrastAllergy",
                format!(
                    "Contrast allergy on file{}; contrast-enhanced {} requested",
                    reaction, imaging.modality
                ),
                Severity::Critical,
            ));
        }
    }

    if let Some(renal) = &scenario.renal_function {
        if renal.is_impaired() {
            let egfr = renal
                .egfr
                .map(|e| format!(" (eGFR {:.0})", e))
                .unwrap_or_default();
            issues.push(ValidationIssue::new(
                "renalFunction",
                format!(
                    "Renal impairment{} with contrast-enhanced {}",
                    egfr, imaging.modality
                ),
                Severity::Critical,
            ));
        }

        if scenario.medications.metformin
            && agent == ContrastAgent::Iodinated
            && renal.egfr.is_some_and(|e| e < METFORMIN_EGFR_CAUTION)
        {
            issues.push(ValidationIssue::new(
                "medications.metformin",
                "Metformin with iodinated contrast and reduced eGFR; consider holding metformin for 48 hours"
                    .to_string(),
                Severity::Warning,
            ));
        }
    }
}

fn check_anticoagulation(scenario: &ClinicalScenario, issues: &mut Vec<ValidationIssue>) {
    if !scenario.medications.anticoagulation {
        return;
    }
    let imaging = &scenario.proposed_imaging;
    let indication = imaging.indication.to_lowercase();
    let procedural = imaging.modality == Modality::Fluoroscopy
        || PROCEDURAL_TERMS.iter().any(|t| indication.contains(t));

    if procedural {
        issues.push(ValidationIssue::new(
            "medications.anticoagulation",
            format!(
                "Patient is anticoagulated; review bleeding risk before {}",
                imaging.describe()
            ),
            Severity::Warning,
        ));
    }
}

fn check_prior_imaging(scenario: &ClinicalScenario, issues: &mut Vec<ValidationIssue>) {
    let imaging = &scenario.proposed_imaging;
    let body_part = imaging.body_part.trim();

    for prior in &scenario.prior_imaging {
        let same_study = prior.modality == imaging.modality
            && prior.body_part.trim().eq_ignore_ascii_case(body_part);
        let recent = prior.weeks_ago.map_or(true, |w| w < DUPLICATE_WINDOW_WEEKS);

        if same_study && recent {
            let when = prior
                .weeks_ago
                .map(|w| format!(" {:.0} weeks ago", w))
                .unwrap_or_default();
            issues.push(ValidationIssue::new(
                "priorImaging",
                format!(
                    "{} {} was already performed{}; confirm a repeat study is needed",
                    prior.modality, prior.body_part, when
                ),
                Severity::Warning,
            ));
        }
    }
}

/// Validate a scenario, returning every finding.
///
/// Findings never block scoring. Pregnancy with a radiation-bearing study is
/// reported as [`Severity::Critical`] but carries no numeric penalty here.
pub fn validate_scenario(scenario: &ClinicalScenario) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    check_required_text(scenario, &mut issues);
    check_age(scenario, &mut issues);
    check_unflagged_findings(scenario, &mut issues);
    check_duration_consistency(scenario, &mut issues);
    check_pregnancy(scenario, &mut issues);
    check_contrast(scenario, &mut issues);
    check_anticoagulation(scenario, &mut issues);
    check_prior_imaging(scenario, &mut issues);

    tracing::debug!(issues = issues.len(), "validated scenario");
    issues
}
