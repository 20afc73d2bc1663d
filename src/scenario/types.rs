use serde::{Deserialize, Serialize};
use std::fmt;

/// Imaging modality of a proposed or prior study.
///
/// Parsing is total: anything that is not recognised is kept verbatim as
/// [`Modality::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Modality {
    Ct,
    Mri,
    XRay,
    Ultrasound,
    Fluoroscopy,
    NuclearMedicine,
    Pet,
    Mammography,
    Other(String),
}

impl Modality {
    pub fn parse(s: &str) -> Self {
        let text = s.trim().to_lowercase();
        let compact: String = text.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        let first = text
            .split(|c: char| !c.is_ascii_alphanumeric())
            .find(|t| !t.is_empty())
            .unwrap_or("");

        if first == "pet" || compact.starts_with("petct") {
            Modality::Pet
        } else if first == "ct"
            || first == "cta"
            || text.contains("computed tomography")
            || text.contains("cat scan")
        {
            Modality::Ct
        } else if first == "mri"
            || first == "mr"
            || first == "mra"
            || text.contains("magnetic resonance")
        {
            Modality::Mri
        } else if compact.starts_with("xray")
            || first == "xr"
            || text.contains("radiograph")
            || text.contains("plain film")
        {
            Modality::XRay
        } else if first == "us" || text.contains("ultrasound") || text.contains("sonograph") {
            Modality::Ultrasound
        } else if text.contains("fluoro") {
            Modality::Fluoroscopy
        } else if first == "nm"
            || text.contains("nuclear")
            || text.contains("bone scan")
            || text.contains("spect")
            || text.contains("scintigra")
        {
            Modality::NuclearMedicine
        } else if text.contains("mammo") {
            Modality::Mammography
        } else {
            Modality::Other(s.trim().to_string())
        }
    }

    /// Human-readable name used in recommendations and alternatives
    pub fn label(&self) -> &str {
        match self {
            Modality::Ct => "CT",
            Modality::Mri => "MRI",
            Modality::XRay => "X-ray",
            Modality::Ultrasound => "Ultrasound",
            Modality::Fluoroscopy => "Fluoroscopy",
            Modality::NuclearMedicine => "Nuclear medicine",
            Modality::Pet => "PET",
            Modality::Mammography => "Mammography",
            Modality::Other(name) => name,
        }
    }

    pub fn uses_ionizing_radiation(&self) -> bool {
        matches!(
            self,
            Modality::Ct
                | Modality::XRay
                | Modality::Fluoroscopy
                | Modality::NuclearMedicine
                | Modality::Pet
                | Modality::Mammography
        )
    }

    /// Contrast agent the modality would use if contrast were given
    pub fn contrast_agent(&self) -> Option<ContrastAgent> {
        match self {
            Modality::Ct | Modality::Fluoroscopy => Some(ContrastAgent::Iodinated),
            Modality::Mri => Some(ContrastAgent::Gadolinium),
            _ => None,
        }
    }
}

impl From<String> for Modality {
    fn from(s: String) -> Self {
        Modality::parse(&s)
    }
}

impl From<Modality> for String {
    fn from(m: Modality) -> Self {
        m.label().to_string()
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Routine,
    Urgent,
    #[serde(alias = "emergent")]
    Stat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PregnancyStatus {
    Pregnant,
    NotPregnant,
    Possible,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastAgent {
    Iodinated,
    Gadolinium,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastAllergy {
    #[serde(default)]
    pub agent: ContrastAgent,
    #[serde(default)]
    pub reaction: Option<String>,
}

impl ContrastAllergy {
    /// An allergy of unknown agent is treated as matching any contrast study
    pub fn applies_to(&self, agent: ContrastAgent) -> bool {
        self.agent == ContrastAgent::Unknown || self.agent == agent
    }
}

/// eGFR below which renal function is considered impaired for contrast purposes
pub const IMPAIRED_EGFR: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenalFunction {
    #[serde(default)]
    pub egfr: Option<f64>,
    #[serde(default)]
    pub impaired: bool,
}

impl RenalFunction {
    pub fn is_impaired(&self) -> bool {
        self.impaired || self.egfr.is_some_and(|e| e < IMPAIRED_EGFR)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Medications {
    pub anticoagulation: bool,
    pub metformin: bool,
}

/// Named red-flag checkboxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RedFlags {
    pub cancer_history: bool,
    pub neuro_deficit: bool,
    pub fever: bool,
    pub weight_loss: bool,
    pub trauma: bool,
    pub immunocompromised: bool,
    pub iv_drug_use: bool,
    pub age_over_50: bool,
    pub age_under_18: bool,
    pub progressive_symptoms: bool,
    pub sudden_onset: bool,
    pub bladder_bowel_dysfunction: bool,
}

impl RedFlags {
    fn entries(&self) -> [(&'static str, bool); 12] {
        [
            ("cancer history", self.cancer_history),
            ("neurological deficit", self.neuro_deficit),
            ("fever", self.fever),
            ("unexplained weight loss", self.weight_loss),
            ("trauma", self.trauma),
            ("immunocompromised", self.immunocompromised),
            ("IV drug use", self.iv_drug_use),
            ("age over 50", self.age_over_50),
            ("age under 18", self.age_under_18),
            ("progressive symptoms", self.progressive_symptoms),
            ("sudden onset", self.sudden_onset),
            ("bladder/bowel dysfunction", self.bladder_bowel_dysfunction),
        ]
    }

    pub fn any(&self) -> bool {
        self.entries().iter().any(|(_, set)| *set)
    }

    pub fn count(&self) -> usize {
        self.entries().iter().filter(|(_, set)| *set).count()
    }

    /// Names of the flags that are set, in declaration order
    pub fn present(&self) -> Vec<&'static str> {
        self.entries()
            .iter()
            .filter(|(_, set)| *set)
            .map(|(name, _)| *name)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedImaging {
    pub modality: Modality,
    pub body_part: String,
    pub indication: String,
    #[serde(default)]
    pub urgency: Urgency,
    /// Explicit contrast flag; when absent the indication text decides
    #[serde(default)]
    pub contrast: Option<bool>,
}

impl ProposedImaging {
    pub fn new(modality: Modality, body_part: &str, indication: &str) -> Self {
        Self {
            modality,
            body_part: body_part.to_string(),
            indication: indication.to_string(),
            urgency: Urgency::Routine,
            contrast: None,
        }
    }

    pub fn uses_contrast(&self) -> bool {
        self.contrast.unwrap_or_else(|| {
            let text = self.indication.to_lowercase();
            !text.contains("without contrast")
                && (text.contains("with contrast")
                    || text.contains("w/ contrast")
                    || text.contains("contrast-enhanced")
                    || text.contains("with and without"))
        })
    }

    /// e.g. "CT lumbar spine"
    pub fn describe(&self) -> String {
        let body_part = self.body_part.trim();
        if body_part.is_empty() {
            self.modality.label().to_string()
        } else {
            format!("{} {}", self.modality.label(), body_part)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorImaging {
    pub modality: Modality,
    pub body_part: String,
    #[serde(default)]
    pub weeks_ago: Option<f64>,
    #[serde(default)]
    pub result: Option<String>,
}

/// A fully-populated clinical scenario.
///
/// Every structurally required field is present; text fields may still be
/// blank, which the validator reports without blocking scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalScenario {
    pub patient_age: u32,
    pub sex: String,
    pub chief_complaint: String,
    #[serde(default)]
    pub clinical_history: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub duration: String,
    #[serde(default)]
    pub red_flags: RedFlags,
    #[serde(default)]
    pub pregnancy_status: Option<PregnancyStatus>,
    #[serde(default)]
    pub contrast_allergy: Option<ContrastAllergy>,
    #[serde(default)]
    pub renal_function: Option<RenalFunction>,
    #[serde(default)]
    pub medications: Medications,
    #[serde(default)]
    pub conservative_therapy_tried: Option<bool>,
    pub proposed_imaging: ProposedImaging,
    #[serde(default)]
    pub prior_imaging: Vec<PriorImaging>,
}

impl ClinicalScenario {
    /// Minimal scenario with every optional field left empty
    pub fn new(
        patient_age: u32,
        sex: &str,
        chief_complaint: &str,
        duration: &str,
        proposed_imaging: ProposedImaging,
    ) -> Self {
        Self {
            patient_age,
            sex: sex.to_string(),
            chief_complaint: chief_complaint.to_string(),
            clinical_history: String::new(),
            symptoms: Vec::new(),
            duration: duration.to_string(),
            red_flags: RedFlags::default(),
            pregnancy_status: None,
            contrast_allergy: None,
            renal_function: None,
            medications: Medications::default(),
            conservative_therapy_tried: None,
            proposed_imaging,
            prior_imaging: Vec::new(),
        }
    }

    pub fn is_pregnant(&self) -> bool {
        self.pregnancy_status == Some(PregnancyStatus::Pregnant)
    }

    /// Checkbox flags plus the age flags implied by `patient_age`
    pub fn effective_red_flags(&self) -> RedFlags {
        let mut flags = self.red_flags;
        flags.age_over_50 |= self.patient_age > 50;
        flags.age_under_18 |= self.patient_age < 18;
        flags
    }

    /// Lower-cased complaint, history and symptoms joined for keyword searches
    pub fn clinical_text(&self) -> String {
        let mut parts = vec![self.chief_complaint.as_str(), self.clinical_history.as_str()];
        parts.extend(self.symptoms.iter().map(String::as_str));
        parts
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join(". ")
            .to_lowercase()
    }
}
