//! Console-level failures

use crate::config::ConfigError;
use crate::session::SessionError;
use dispatch_client::ApiError;
use dispatch_model::Role;

/// Result alias for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Anything a console command can fail with
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Session file could not be read or written
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Settings are invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No stored session
    #[error("not signed in; run `dispatch-console login` first")]
    NotSignedIn,

    /// Account role does not match the portal
    #[error("Unauthorized role: {role}")]
    UnauthorizedRole {
        /// Role the backend reported
        role: Role,
    },

    /// Stored session belongs to the other portal
    #[error("signed in to the {actual} portal, but this command needs the {expected} portal")]
    WrongPortal {
        /// Portal the command needs
        expected: &'static str,
        /// Portal of the stored session
        actual: &'static str,
    },

    /// Record not present in the freshly loaded list
    #[error("{kind} {id} not found")]
    NotFound {
        /// Record kind
        kind: &'static str,
        /// Requested id
        id: String,
    },

    /// Requested status change is not allowed from the current status
    #[error("cannot {action} {kind} {id}: status is {status}")]
    InvalidTransition {
        /// Record kind
        kind: &'static str,
        /// Record id
        id: String,
        /// Attempted action
        action: &'static str,
        /// Current status
        status: String,
    },

    /// User declined a confirmation prompt
    #[error("cancelled")]
    Cancelled,

    /// Output could not be encoded
    #[error("cannot encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// Terminal I/O failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// Whether the failure came from the backend being unreachable
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_network())
    }

    /// Whether the user backed out rather than something failing
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Process exit code for this failure
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Cancelled => 0,
            Self::NotSignedIn | Self::UnauthorizedRole { .. } | Self::WrongPortal { .. } => 3,
            Self::Config(_) => 4,
            Self::Api(err) if err.is_network() => 5,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_rejection_reads_like_the_login_page() {
        let err = ConsoleError::UnauthorizedRole {
            role: Role::VendorAdmin,
        };
        assert_eq!(err.to_string(), "Unauthorized role: vendor_admin");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn network_failures_are_flagged() {
        let err = ConsoleError::from(ApiError::NetworkUnavailable {
            path: "/orders".into(),
            reason: "timed out".into(),
        });
        assert!(err.is_network());
        assert_eq!(err.exit_code(), 5);
        assert!(!ConsoleError::Cancelled.is_network());
    }
}
