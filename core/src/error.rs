use thiserror::Error;

/// Errors surfaced by the filter engine.
///
/// Per-record evaluation is total, so these cover the boundaries around a
/// scan rather than the scan itself. Both variants leave the engine on its
/// last-known-good state: pending, applied, and results are untouched.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Imported filter text was rejected.
    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] jsonsift::ParseError),

    /// A background scan aborted before producing a result.
    #[error("scan failed: {0}")]
    ScanFailed(String),
}
