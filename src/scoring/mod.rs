pub mod alternatives;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod explanation;
pub mod factors;
pub mod topics;

pub use alternatives::{generate_alternatives, Alternative, Comparison};
pub use classifier::{classify, Classification, MatchKind};
pub use config::*;
pub use engine::{aggregate, AggregateScore, Category, Confidence, FactorContribution};
pub use explanation::{build_explanation, Explanation};
pub use factors::{ClinicalFactor, Direction, Rule, ScoringContext};
pub use topics::{Scorer, ScorerRegistry, Topic, TopicScore};
