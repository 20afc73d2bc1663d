use serde::{Deserialize, Serialize};

use super::types::{
    ClinicalScenario, ContrastAllergy, Medications, Modality, PregnancyStatus, PriorImaging,
    ProposedImaging, RedFlags, RenalFunction, Urgency,
};
use crate::error::{EngineResult, EvaluationError};

/// Proposed imaging as it arrives from a caller, before structural checks
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagingInput {
    pub modality: Option<String>,
    pub body_part: Option<String>,
    pub indication: Option<String>,
    pub urgency: Option<Urgency>,
    pub contrast: Option<bool>,
}

/// Raw scenario payload.
///
/// Mirrors [`ClinicalScenario`] but every structurally required field is
/// optional, so a payload with missing fields still deserializes and the
/// missing fields can be reported together.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioInput {
    pub patient_age: Option<u32>,
    pub sex: Option<String>,
    pub chief_complaint: Option<String>,
    pub clinical_history: Option<String>,
    pub symptoms: Vec<String>,
    pub duration: Option<String>,
    pub red_flags: RedFlags,
    pub pregnancy_status: Option<PregnancyStatus>,
    pub contrast_allergy: Option<ContrastAllergy>,
    pub renal_function: Option<RenalFunction>,
    pub medications: Medications,
    pub conservative_therapy_tried: Option<bool>,
    pub proposed_imaging: Option<ImagingInput>,
    pub prior_imaging: Vec<PriorImaging>,
}

impl ScenarioInput {
    /// Wire names of every absent structural field, in declaration order
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if self.patient_age.is_none() {
            missing.push("patientAge".to_string());
        }
        if self.sex.is_none() {
            missing.push("sex".to_string());
        }
        if self.chief_complaint.is_none() {
            missing.push("chiefComplaint".to_string());
        }
        if self.duration.is_none() {
            missing.push("duration".to_string());
        }

        match &self.proposed_imaging {
            None => missing.push("proposedImaging".to_string()),
            Some(imaging) => {
                if imaging.modality.is_none() {
                    missing.push("proposedImaging.modality".to_string());
                }
                if imaging.body_part.is_none() {
                    missing.push("proposedImaging.bodyPart".to_string());
                }
                if imaging.indication.is_none() {
                    missing.push("proposedImaging.indication".to_string());
                }
            }
        }

        missing
    }

    /// Convert into a [`ClinicalScenario`], refusing when structural fields are absent
    pub fn into_scenario(self) -> EngineResult<ClinicalScenario> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(EvaluationError::MissingFields(missing));
        }

        // All `None`s were rejected above
        let (
            Some(patient_age),
            Some(sex),
            Some(chief_complaint),
            Some(duration),
            Some(ImagingInput {
                modality: Some(modality),
                body_part: Some(body_part),
                indication: Some(indication),
                urgency,
                contrast,
            }),
        ) = (
            self.patient_age,
            self.sex,
            self.chief_complaint,
            self.duration,
            self.proposed_imaging,
        )
        else {
            return Err(EvaluationError::MissingFields(Vec::new()));
        };

        Ok(ClinicalScenario {
            patient_age,
            sex,
            chief_complaint,
            clinical_history: self.clinical_history.unwrap_or_default(),
            symptoms: self.symptoms,
            duration,
            red_flags: self.red_flags,
            pregnancy_status: self.pregnancy_status,
            contrast_allergy: self.contrast_allergy,
            renal_function: self.renal_function,
            medications: self.medications,
            conservative_therapy_tried: self.conservative_therapy_tried,
            proposed_imaging: ProposedImaging {
                modality: Modality::parse(&modality),
                body_part,
                indication,
                urgency: urgency.unwrap_or_default(),
                contrast,
            },
            prior_imaging: self.prior_imaging,
        })
    }
}

impl From<ClinicalScenario> for ScenarioInput {
    fn from(s: ClinicalScenario) -> Self {
        Self {
            patient_age: Some(s.patient_age),
            sex: Some(s.sex),
            chief_complaint: Some(s.chief_complaint),
            clinical_history: Some(s.clinical_history),
            symptoms: s.symptoms,
            duration: Some(s.duration),
            red_flags: s.red_flags,
            pregnancy_status: s.pregnancy_status,
            contrast_allergy: s.contrast_allergy,
            renal_function: s.renal_function,
            medications: s.medications,
            conservative_therapy_tried: s.conservative_therapy_tried,
            proposed_imaging: Some(ImagingInput {
                modality: Some(s.proposed_imaging.modality.label().to_string()),
                body_part: Some(s.proposed_imaging.body_part),
                indication: Some(s.proposed_imaging.indication),
                urgency: Some(s.proposed_imaging.urgency),
                contrast: s.proposed_imaging.contrast,
            }),
            prior_imaging: s.prior_imaging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_reports_all_structural_fields() {
        let missing = ScenarioInput::default().missing_fields();
        assert_eq!(
            missing,
            vec!["patientAge", "sex", "chiefComplaint", "duration", "proposedImaging"]
        );
    }

    #[test]
    fn test_missing_imaging_subfields() {
        let input = ScenarioInput {
            patient_age: Some(40),
            sex: Some("female".to_string()),
            chief_complaint: Some("headache".to_string()),
            duration: Some("2 weeks".to_string()),
            proposed_imaging: Some(ImagingInput {
                modality: Some("CT".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = input.into_scenario().unwrap_err();
        match err {
            EvaluationError::MissingFields(fields) => {
                assert_eq!(
                    fields,
                    vec!["proposedImaging.bodyPart", "proposedImaging.indication"]
                );
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_blank_strings_are_not_structural_errors() {
        let input = ScenarioInput {
            patient_age: Some(40),
            sex: Some("  ".to_string()),
            chief_complaint: Some(String::new()),
            duration: Some(String::new()),
            proposed_imaging: Some(ImagingInput {
                modality: Some("MRI".to_string()),
                body_part: Some(String::new()),
                indication: Some(String::new()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let scenario = input.into_scenario().unwrap();
        assert_eq!(scenario.proposed_imaging.modality, Modality::Mri);
        assert!(scenario.clinical_history.is_empty());
    }

    #[test]
    fn test_round_trip_through_clinical_scenario() {
        let scenario = ClinicalScenario::new(
            30,
            "female",
            "RLQ pain",
            "1 day",
            ProposedImaging::new(Modality::Ultrasound, "abdomen", "appendicitis"),
        );
        let back = ScenarioInput::from(scenario.clone()).into_scenario().unwrap();
        assert_eq!(back, scenario);
    }
}
