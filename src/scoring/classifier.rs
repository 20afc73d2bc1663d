//! Chief-complaint to topic routing.

use serde::Serialize;

use super::topics::Topic;
use crate::scenario::text::contains_word;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Substring of the complaint
    Phrase,
    /// Whole-word abbreviation ("lbp", "ha")
    Abbreviation,
}

/// Ordered keyword table. The first entry found in the complaint wins.
pub const TOPIC_KEYWORDS: &[(&str, Topic, MatchKind)] = &[
    ("back pain", Topic::LowBackPain, MatchKind::Phrase),
    ("low back", Topic::LowBackPain, MatchKind::Phrase),
    ("lumbar", Topic::LowBackPain, MatchKind::Phrase),
    ("lbp", Topic::LowBackPain, MatchKind::Abbreviation),
    ("headache", Topic::Headache, MatchKind::Phrase),
    ("migraine", Topic::Headache, MatchKind::Phrase),
    ("ha", Topic::Headache, MatchKind::Abbreviation),
    ("abdominal", Topic::AbdominalPain, MatchKind::Phrase),
    ("abdomen", Topic::AbdominalPain, MatchKind::Phrase),
    ("belly", Topic::AbdominalPain, MatchKind::Phrase),
    ("rlq", Topic::AbdominalPain, MatchKind::Abbreviation),
    ("ruq", Topic::AbdominalPain, MatchKind::Abbreviation),
    ("llq", Topic::AbdominalPain, MatchKind::Abbreviation),
    ("luq", Topic::AbdominalPain, MatchKind::Abbreviation),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub topic: Topic,
    /// `None` when the complaint fell through to the generic scorer
    pub matched_keyword: Option<&'static str>,
    pub kind: Option<MatchKind>,
}

impl Classification {
    pub fn is_specific(&self) -> bool {
        self.topic != Topic::Generic
    }
}

/// Route a chief complaint to a topic. Never fails.
pub fn classify(chief_complaint: &str) -> Classification {
    let complaint = chief_complaint.to_lowercase();

    let found = TOPIC_KEYWORDS.iter().find(|(keyword, _, kind)| match kind {
        MatchKind::Phrase => complaint.contains(*keyword),
        MatchKind::Abbreviation => contains_word(&complaint, keyword),
    });

    let classification = match found {
        Some((keyword, topic, kind)) => Classification {
            topic: *topic,
            matched_keyword: Some(*keyword),
            kind: Some(*kind),
        },
        None => Classification {
            topic: Topic::Generic,
            matched_keyword: None,
            kind: None,
        },
    };

    tracing::debug!(
        topic = %classification.topic,
        keyword = classification.matched_keyword.unwrap_or("-"),
        "classified chief complaint"
    );
    classification
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_matches() {
        assert_eq!(classify("Lower back pain").topic, Topic::LowBackPain);
        assert_eq!(classify("Lumbar radiculopathy").topic, Topic::LowBackPain);
        assert_eq!(classify("Severe HEADACHE").topic, Topic::Headache);
        assert_eq!(classify("Migraine with aura").topic, Topic::Headache);
        assert_eq!(classify("Acute abdominal pain").topic, Topic::AbdominalPain);
        assert_eq!(classify("Belly ache").topic, Topic::AbdominalPain);
    }

    #[test]
    fn test_abbreviations_match_whole_words() {
        let c = classify("LBP x 3 days");
        assert_eq!(c.topic, Topic::LowBackPain);
        assert_eq!(c.kind, Some(MatchKind::Abbreviation));

        assert_eq!(classify("HA since morning").topic, Topic::Headache);
        assert_eq!(classify("RUQ pain").topic, Topic::AbdominalPain);
        // "ha" inside another word is not a headache
        assert_eq!(classify("Shaking chills").topic, Topic::Generic);
    }

    #[test]
    fn test_first_match_wins() {
        let c = classify("Headache and back pain");
        assert_eq!(c.topic, Topic::LowBackPain);
        assert_eq!(c.matched_keyword, Some("back pain"));
    }

    #[test]
    fn test_no_match_is_generic() {
        let c = classify("Knee pain");
        assert_eq!(c.topic, Topic::Generic);
        assert_eq!(c.matched_keyword, None);
        assert!(!c.is_specific());

        assert_eq!(classify("").topic, Topic::Generic);
    }
}
