//! Error taxonomy shared by every backend call

use dispatch_model::ModelError;

/// Result alias for backend calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a backend call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never got an HTTP answer (refused, DNS, timeout)
    #[error("network unavailable for {path}: {reason}")]
    NetworkUnavailable {
        /// Request path
        path: String,
        /// Transport-level cause
        reason: String,
    },

    /// The backend answered with a non-2xx status or an error envelope
    #[error("request to {path} failed: {message}")]
    RequestFailed {
        /// Request path
        path: String,
        /// HTTP status, `None` when the failure came from the envelope
        status: Option<u16>,
        /// Backend message, or a generic one
        message: String,
    },

    /// A payload failed local validation and was never sent
    #[error("validation rejected: {0}")]
    ValidationRejected(#[from] ModelError),

    /// The body could not be decoded into the expected shape
    #[error("malformed response from {path}: {detail}")]
    MalformedResponse {
        /// Request path
        path: String,
        /// Decoder message
        detail: String,
    },
}

impl ApiError {
    /// Whether repeating the same call might succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkUnavailable { .. } => true,
            Self::RequestFailed { status, .. } => {
                matches!(status, Some(s) if *s >= 500 || *s == 408 || *s == 429)
            }
            Self::ValidationRejected(_) | Self::MalformedResponse { .. } => false,
        }
    }

    /// Whether the backend could not be reached at all
    #[inline]
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkUnavailable { .. })
    }

    /// HTTP status the backend answered with, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    pub(crate) fn network(path: &str, err: &reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };
        Self::NetworkUnavailable {
            path: path.to_string(),
            reason,
        }
    }

    pub(crate) fn malformed(path: &str, detail: impl ToString) -> Self {
        Self::MalformedResponse {
            path: path.to_string(),
            detail: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_retryable_failures() {
        let network = ApiError::NetworkUnavailable {
            path: "/orders".into(),
            reason: "connection failed".into(),
        };
        assert!(network.is_retryable());
        assert!(network.is_network());

        let server = ApiError::RequestFailed {
            path: "/orders".into(),
            status: Some(503),
            message: "down".into(),
        };
        assert!(server.is_retryable());
        assert_eq!(server.status(), Some(503));

        let rejected = ApiError::RequestFailed {
            path: "/orders".into(),
            status: Some(404),
            message: "missing".into(),
        };
        assert!(!rejected.is_retryable());

        let envelope = ApiError::RequestFailed {
            path: "/orders".into(),
            status: None,
            message: "nope".into(),
        };
        assert!(!envelope.is_retryable());
        assert!(!ApiError::from(ModelError::MissingField("name")).is_retryable());
    }

    #[test]
    fn messages_name_the_path() {
        let err = ApiError::RequestFailed {
            path: "/vendors".into(),
            status: Some(500),
            message: "Failed to fetch data".into(),
        };
        assert_eq!(err.to_string(), "request to /vendors failed: Failed to fetch data");
    }
}
