use serde::{Deserialize, Serialize};

use super::config::{CONSERVATIVE_ALTERNATIVE_MAX, MAX_SCORE, MIN_SCORE, XRAY_SCORE_PENALTY};
use crate::scenario::{Modality, ProposedImaging};

pub const CONSERVATIVE_MANAGEMENT: &str = "Conservative management / observation";

/// Ordinal comparison against the requested study
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    None,
    Lower,
    Similar,
    Higher,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub procedure: String,
    pub score: u8,
    pub rationale: String,
    pub radiation: Comparison,
    pub cost: Comparison,
}

fn with_body_part(procedure: &str, body_part: &str, suffix: &str) -> String {
    [procedure, body_part.trim(), suffix]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Alternatives to the requested study, in presentation order.
///
/// Conservative management always comes first when offered.
pub fn generate_alternatives(imaging: &ProposedImaging, final_score: u8) -> Vec<Alternative> {
    let mut alternatives = Vec::new();

    if final_score <= CONSERVATIVE_ALTERNATIVE_MAX {
        alternatives.push(Alternative {
            procedure: CONSERVATIVE_MANAGEMENT.to_string(),
            score: MAX_SCORE,
            rationale: "Most presentations at this score improve with time, analgesia and activity; image if symptoms persist or red flags develop".to_string(),
            radiation: Comparison::None,
            cost: Comparison::Lower,
        });
    }

    let body_part = imaging.body_part.as_str();

    if imaging.modality == Modality::Ct {
        alternatives.push(Alternative {
            procedure: with_body_part("MRI", body_part, "without contrast"),
            score: final_score,
            rationale: "Comparable diagnostic yield without ionizing radiation".to_string(),
            radiation: Comparison::None,
            cost: Comparison::Similar,
        });
    }

    if matches!(imaging.modality, Modality::Ct | Modality::Mri) {
        let radiation = if imaging.modality == Modality::Ct {
            Comparison::Lower
        } else {
            Comparison::Higher
        };
        alternatives.push(Alternative {
            procedure: with_body_part("X-ray", body_part, ""),
            score: final_score
                .saturating_sub(XRAY_SCORE_PENALTY)
                .max(MIN_SCORE),
            rationale: "Lower-cost first study; limited sensitivity for soft tissue pathology"
                .to_string(),
            radiation,
            cost: Comparison::Lower,
        });
    }

    alternatives
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imaging(modality: Modality) -> ProposedImaging {
        ProposedImaging::new(modality, "lumbar spine", "back pain")
    }

    #[test]
    fn test_low_score_ct_alternatives() {
        let alts = generate_alternatives(&imaging(Modality::Ct), 1);

        assert_eq!(alts.len(), 3);
        assert_eq!(alts[0].procedure, CONSERVATIVE_MANAGEMENT);
        assert_eq!(alts[0].score, 9);
        assert_eq!(alts[0].radiation, Comparison::None);
        assert_eq!(alts[1].procedure, "MRI lumbar spine without contrast");
        assert_eq!(alts[1].score, 1);
        assert_eq!(alts[1].cost, Comparison::Similar);
        assert_eq!(alts[2].procedure, "X-ray lumbar spine");
        assert_eq!(alts[2].score, 1);
        assert_eq!(alts[2].radiation, Comparison::Lower);
    }

    #[test]
    fn test_boundary_score_four_offers_conservative() {
        let alts = generate_alternatives(&imaging(Modality::Ct), 4);
        assert_eq!(alts[0].procedure, CONSERVATIVE_MANAGEMENT);
        assert_eq!(alts[1].score, 4);
        assert_eq!(alts[2].score, 2);
    }

    #[test]
    fn test_high_score_mri() {
        let alts = generate_alternatives(&imaging(Modality::Mri), 8);
        assert_eq!(alts.len(), 1);
        assert_eq!(alts[0].procedure, "X-ray lumbar spine");
        assert_eq!(alts[0].score, 6);
        assert_eq!(alts[0].radiation, Comparison::Higher);
    }

    #[test]
    fn test_other_modalities_only_get_conservative() {
        assert!(generate_alternatives(&imaging(Modality::Ultrasound), 7).is_empty());

        let alts = generate_alternatives(&imaging(Modality::XRay), 2);
        assert_eq!(alts.len(), 1);
        assert_eq!(alts[0].procedure, CONSERVATIVE_MANAGEMENT);
    }

    #[test]
    fn test_missing_body_part() {
        let alts = generate_alternatives(&ProposedImaging::new(Modality::Ct, "  ", "pain"), 6);
        assert_eq!(alts[0].procedure, "MRI without contrast");
        assert_eq!(alts[1].procedure, "X-ray");
    }
}
