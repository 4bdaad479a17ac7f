//! Signed-in user persisted between invocations

use crate::error::{ConsoleError, ConsoleResult};
use chrono::{DateTime, Utc};
use dispatch_model::{Role, SessionUser, VendorId};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Session file failures
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// File exists but could not be read
    #[error("cannot read session {}: {source}", .path.display())]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File could not be written or removed
    #[error("cannot write session {}: {source}", .path.display())]
    Write {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File is not a session record
    #[error("corrupt session {}: {source}", .path.display())]
    Corrupt {
        /// File path
        path: PathBuf,
        /// Decoder error
        source: serde_json::Error,
    },
}

/// Which half of the console a session signed in to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    /// Platform administration
    Admin,
    /// Vendor self-service
    Vendor,
}

impl Portal {
    /// Whether an account with `role` may use this portal
    #[must_use]
    pub fn accepts(self, role: &Role) -> bool {
        match self {
            Self::Admin => matches!(role, Role::SuperAdmin | Role::Admin),
            Self::Vendor => matches!(role, Role::VendorAdmin),
        }
    }

    /// Lowercase name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Vendor => "vendor",
        }
    }
}

/// The authenticated user and the portal they entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Account as returned by the login endpoint
    pub user: SessionUser,
    /// Portal signed in to
    pub portal: Portal,
    /// Sign-in time
    pub signed_in_at: DateTime<Utc>,
}

impl SessionContext {
    /// Session for `user` in `portal`, checking the role
    ///
    /// # Errors
    /// `UnauthorizedRole` when the portal does not accept the user's role.
    pub fn open(user: SessionUser, portal: Portal) -> ConsoleResult<Self> {
        if !portal.accepts(&user.role) {
            return Err(ConsoleError::UnauthorizedRole { role: user.role });
        }
        Ok(Self {
            user,
            portal,
            signed_in_at: Utc::now(),
        })
    }

    /// Vendor whose records this session sees
    #[must_use]
    pub fn vendor_scope(&self) -> VendorId {
        self.user.vendor_scope()
    }

    /// Fail unless the session belongs to `portal`
    ///
    /// # Errors
    /// `WrongPortal`.
    pub fn require(&self, portal: Portal) -> ConsoleResult<()> {
        if self.portal == portal {
            Ok(())
        } else {
            Err(ConsoleError::WrongPortal {
                expected: portal.name(),
                actual: self.portal.name(),
            })
        }
    }
}

/// One JSON file holding the current [`SessionContext`]
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at `path`; nothing is touched until a call
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored session, `None` when signed out
    ///
    /// # Errors
    /// `Read` or `Corrupt`.
    pub fn load(&self) -> Result<Option<SessionContext>, SessionError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SessionError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    /// Stored session or `NotSignedIn`
    ///
    /// # Errors
    /// `NotSignedIn`, or the load failure.
    pub fn require(&self) -> ConsoleResult<SessionContext> {
        self.load()?.ok_or(ConsoleError::NotSignedIn)
    }

    /// Replace the stored session
    ///
    /// The record is written to a sibling temp file and renamed into place.
    ///
    /// # Errors
    /// `Write`.
    pub fn save(&self, session: &SessionContext) -> Result<(), SessionError> {
        let write_err = |source: std::io::Error| SessionError::Write {
            path: self.path.clone(),
            source,
        };
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        serde_json::to_writer_pretty(&mut tmp, session).map_err(|err| write_err(err.into()))?;
        tmp.flush().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|err| write_err(err.error))?;

        info!(user = %session.user.id, portal = session.portal.name(), "session saved");
        Ok(())
    }

    /// Remove the stored session; returns whether one existed
    ///
    /// # Errors
    /// `Write` for anything but a missing file.
    pub fn clear(&self) -> Result<bool, SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session cleared");
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(SessionError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_test_utils::fixtures::{admin_user, user, vendor_user};
    use dispatch_model::ServiceType;
    use pretty_assertions::assert_eq;

    #[test]
    fn portals_check_roles() {
        assert!(Portal::Admin.accepts(&Role::SuperAdmin));
        assert!(Portal::Admin.accepts(&Role::Admin));
        assert!(!Portal::Admin.accepts(&Role::VendorAdmin));
        assert!(Portal::Vendor.accepts(&Role::VendorAdmin));
        assert!(!Portal::Vendor.accepts(&Role::Other("customer".into())));
    }

    #[test]
    fn opening_with_wrong_role_fails() {
        let err = SessionContext::open(user("c-1", Role::Other("customer".into())), Portal::Vendor)
            .unwrap_err();
        assert_eq!(err.to_string(), "Unauthorized role: customer");
    }

    #[test]
    fn round_trips_through_the_file_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        assert!(store.load().unwrap().is_none());

        let session =
            SessionContext::open(vendor_user("v-1", ServiceType::Logistics), Portal::Vendor).unwrap();
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
        assert!(matches!(store.require(), Err(ConsoleError::NotSignedIn)));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = SessionStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SessionError::Corrupt { .. }));
    }

    #[test]
    fn portal_mismatch_is_rejected() {
        let session = SessionContext::open(admin_user(), Portal::Admin).unwrap();
        assert!(session.require(Portal::Admin).is_ok());
        assert!(matches!(
            session.require(Portal::Vendor),
            Err(ConsoleError::WrongPortal { expected: "vendor", actual: "admin" })
        ));
    }
}
