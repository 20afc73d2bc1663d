pub mod duration;
pub mod input;
pub mod text;
pub mod types;
pub mod validation;

pub use duration::{normalize_duration, DurationPattern, NormalizedDuration, ParseConfidence};
pub use input::{ImagingInput, ScenarioInput};
pub use types::*;
pub use validation::{validate_scenario, Severity, ValidationIssue};
