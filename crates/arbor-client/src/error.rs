//! Error types for backend fetches.

use crate::path::PathError;

/// Error from a single backend fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] ureq::Error),

    /// Backend answered with a non-success status.
    #[error("HTTP error: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Response body is not the expected JSON shape.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response references a resource outside the configured backend.
    #[error("malformed response: {0}")]
    Integrity(#[from] PathError),

    /// The worker running the fetch stopped before producing a result.
    #[error("fetch worker failed: {0}")]
    Worker(String),
}

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network failure or non-success status; re-navigating may succeed.
    Transient,
    /// The backend answered, but not with a usable record.
    Malformed,
}

impl FetchError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) | Self::Status { .. } | Self::Worker(_) => FailureKind::Transient,
            Self::Decode(_) | Self::Integrity(_) => FailureKind::Malformed,
        }
    }

    /// Backend status code, if the backend answered with an error status.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_is_transient() {
        let err = FetchError::Status {
            status: 503,
            body: "busy".to_owned(),
        };
        assert_eq!(err.kind(), FailureKind::Transient);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "HTTP error: 503 - busy");
    }

    #[test]
    fn test_decode_error_is_malformed() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::from(json_err);
        assert_eq!(err.kind(), FailureKind::Malformed);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_integrity_error_is_malformed() {
        let err = FetchError::from(PathError::RelativeSegment("/..".to_owned()));
        assert_eq!(err.kind(), FailureKind::Malformed);
        assert!(err.to_string().starts_with("malformed response"));
    }
}
