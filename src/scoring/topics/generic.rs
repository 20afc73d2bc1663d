use super::{RuleScorer, Topic};
use crate::scoring::factors::Rule;

const ACR_GENERAL: &str = "ACR Appropriateness Criteria: Overview and Methodology";

pub const RULES: &[Rule] = &[Rule {
    id: "generic-red-flags",
    name: "Red Flags",
    weight: 2.0,
    citation: ACR_GENERAL,
    applies: |ctx| ctx.red_flags.any(),
    explain: |ctx| {
        format!(
            "Red flags present ({}); imaging is more likely to change management",
            ctx.red_flags.present().join(", ")
        )
    },
}];

/// Used for any complaint without a topic-specific scorer
pub const SCORER: RuleScorer = RuleScorer {
    topic: Topic::Generic,
    rules: RULES,
    fallback: None,
};
