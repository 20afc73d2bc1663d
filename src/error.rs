/// Errors returned by the evaluation engine.
///
/// Ordinary clinical branching never produces an error. This covers only
/// payloads the engine refuses to score.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

/// Type alias for Results that can fail with an [`EvaluationError`].
pub type EngineResult<T> = Result<T, EvaluationError>;
