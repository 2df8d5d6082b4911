use thiserror::Error;

/// Errors produced when converting filter text into a filter tree.
///
/// Path-resolution misses and incompatible operator/value pairings are not
/// errors - the evaluator absorbs those per the fail-soft policy.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid filter text: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown operator: {0}")]
    UnknownOperator(String),
}
