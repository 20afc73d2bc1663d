//! Explainable imaging appropriateness scoring.
//!
//! A clinical scenario goes in; a 1-9 appropriateness score comes out with
//! the rules that fired, safer or cheaper alternatives, safety warnings and
//! evidence references. Every evaluation is a pure function of its input.

pub mod error;
pub mod evaluation;
pub mod hooks;
pub mod output;
pub mod scenario;
pub mod scoring;

pub use error::{EngineResult, EvaluationError};
pub use evaluation::{evaluate, evaluate_input, Engine, EvaluationResult};
pub use hooks::handle_hook_request;
