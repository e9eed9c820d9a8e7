//! Error taxonomy shared across the engine

use std::fmt;

/// Failures surfaced by the analytics engine.
///
/// The outer HTTP layer maps `SubjectNotFound` and `MalformedInput` to
/// 4xx-equivalents and `Retrieval` to a 5xx-equivalent. The engine never
/// retries; retry policy belongs to the orchestration layer above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The requested profile does not exist at the retrieval layer.
    SubjectNotFound(String),
    /// Network or automation failure while fetching source data.
    Retrieval(String),
    /// Structurally invalid request, rejected before any computation.
    MalformedInput(String),
}

impl fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyticsError::SubjectNotFound(username) => {
                write!(f, "profile '{}' not found", username)
            }
            AnalyticsError::Retrieval(detail) => write!(f, "retrieval failed: {}", detail),
            AnalyticsError::MalformedInput(detail) => write!(f, "malformed input: {}", detail),
        }
    }
}

impl std::error::Error for AnalyticsError {}

impl AnalyticsError {
    /// True for errors the caller can fix (4xx-equivalents).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalyticsError::SubjectNotFound(_) | AnalyticsError::MalformedInput(_)
        )
    }
}
