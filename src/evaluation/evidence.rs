use serde::Serialize;

use crate::scoring::Topic;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceLink {
    pub title: &'static str,
    pub url: &'static str,
}

const ACR_SEARCH: &str = "https://acsearch.acr.org/list";
const CHOOSING_WISELY: &str = "https://www.choosingwisely.org/";

const LOW_BACK_PAIN: &[EvidenceLink] = &[
    EvidenceLink {
        title: "ACR Appropriateness Criteria: Low Back Pain",
        url: ACR_SEARCH,
    },
    EvidenceLink {
        title: "Choosing Wisely: imaging for uncomplicated low back pain",
        url: CHOOSING_WISELY,
    },
];

const HEADACHE: &[EvidenceLink] = &[
    EvidenceLink {
        title: "ACR Appropriateness Criteria: Headache",
        url: ACR_SEARCH,
    },
    EvidenceLink {
        title: "Choosing Wisely: imaging for uncomplicated headache",
        url: CHOOSING_WISELY,
    },
];

const ABDOMINAL_PAIN: &[EvidenceLink] = &[
    EvidenceLink {
        title: "ACR Appropriateness Criteria: Right Lower Quadrant Pain",
        url: ACR_SEARCH,
    },
    EvidenceLink {
        title: "ACR Appropriateness Criteria: Acute Nonlocalized Abdominal Pain",
        url: ACR_SEARCH,
    },
];

const GENERIC: &[EvidenceLink] = &[EvidenceLink {
    title: "ACR Appropriateness Criteria",
    url: ACR_SEARCH,
}];

/// Static reference links for a topic
pub fn evidence_for(topic: Topic) -> &'static [EvidenceLink] {
    match topic {
        Topic::LowBackPain => LOW_BACK_PAIN,
        Topic::Headache => HEADACHE,
        Topic::AbdominalPain => ABDOMINAL_PAIN,
        Topic::Generic => GENERIC,
    }
}
