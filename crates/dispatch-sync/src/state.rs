//! Per-view snapshot guarded by cycle sequence numbers

use dispatch_client::{ApiError, ApiResult};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, warn};

/// What happened to a finished cycle's result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// New snapshot installed
    Updated,
    /// Cycle failed; previous snapshot kept, error recorded
    Failed,
    /// A later cycle already landed; result dropped
    Stale,
    /// View torn down; result dropped
    Detached,
}

/// Point-in-time copy of a view's state
#[derive(Debug)]
pub struct Snapshot<T> {
    /// Last successfully applied data
    pub data: Option<Arc<T>>,
    /// Error from the most recent failed cycle newer than `data`
    pub last_error: Option<ApiError>,
    /// Sequence number of the cycle that produced `data`
    pub applied_seq: u64,
    /// When `data` was installed
    pub updated_at: Option<Instant>,
    /// Failed cycles since the last success
    pub consecutive_failures: u32,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            last_error: self.last_error.clone(),
            applied_seq: self.applied_seq,
            updated_at: self.updated_at,
            consecutive_failures: self.consecutive_failures,
        }
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            data: None,
            last_error: None,
            applied_seq: 0,
            updated_at: None,
            consecutive_failures: 0,
        }
    }
}

struct Inner<T> {
    snapshot: Snapshot<T>,
    detached: bool,
}

/// Shared state of one mounted view
///
/// Cycles finish in any order; only a result newer than the last applied
/// one is installed, and nothing is installed once the view is detached.
/// Every state change bumps a version observable through [`subscribe`].
///
/// [`subscribe`]: ViewState::subscribe
pub struct ViewState<T> {
    name: String,
    inner: Mutex<Inner<T>>,
    version: watch::Sender<u64>,
}

impl<T> ViewState<T> {
    /// Empty, attached state
    pub fn new(name: impl Into<String>) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            name: name.into(),
            inner: Mutex::new(Inner {
                snapshot: Snapshot::default(),
                detached: false,
            }),
            version,
        }
    }

    /// View name used in logs
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current data, if any cycle has succeeded
    #[must_use]
    pub fn current(&self) -> Option<Arc<T>> {
        self.inner.lock().snapshot.data.clone()
    }

    /// Error of the latest failed cycle, cleared by the next success
    #[must_use]
    pub fn last_error(&self) -> Option<ApiError> {
        self.inner.lock().snapshot.last_error.clone()
    }

    /// Full copy of the state
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<T> {
        self.inner.lock().snapshot.clone()
    }

    /// Receiver that changes whenever the state does
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Whether the view has been torn down
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.inner.lock().detached
    }

    /// Stop accepting results; idempotent
    pub fn detach(&self) {
        let mut inner = self.inner.lock();
        if !inner.detached {
            inner.detached = true;
            debug!(view = %self.name, "view detached");
        }
    }

    /// Offer the result of cycle `seq`
    pub fn apply(&self, seq: u64, result: ApiResult<T>) -> Applied {
        let mut inner = self.inner.lock();
        if inner.detached {
            return Applied::Detached;
        }
        if seq <= inner.snapshot.applied_seq {
            debug!(view = %self.name, seq, applied = inner.snapshot.applied_seq, "discarding stale cycle");
            return Applied::Stale;
        }

        let outcome = match result {
            Ok(data) => {
                let snapshot = &mut inner.snapshot;
                snapshot.data = Some(Arc::new(data));
                snapshot.applied_seq = seq;
                snapshot.updated_at = Some(Instant::now());
                snapshot.last_error = None;
                snapshot.consecutive_failures = 0;
                Applied::Updated
            }
            Err(err) => {
                warn!(view = %self.name, seq, error = %err, "refresh failed, keeping previous data");
                let snapshot = &mut inner.snapshot;
                snapshot.last_error = Some(err);
                snapshot.consecutive_failures = snapshot.consecutive_failures.saturating_add(1);
                Applied::Failed
            }
        };
        drop(inner);

        self.version.send_modify(|v| *v += 1);
        outcome
    }
}

impl<T> std::fmt::Debug for ViewState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ViewState")
            .field("name", &self.name)
            .field("applied_seq", &inner.snapshot.applied_seq)
            .field("has_data", &inner.snapshot.data.is_some())
            .field("detached", &inner.detached)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> ApiError {
        ApiError::NetworkUnavailable {
            path: "/orders".into(),
            reason: "connection failed".into(),
        }
    }

    #[test]
    fn newer_result_replaces_older() {
        let state = ViewState::new("orders");
        assert_eq!(state.apply(1, Ok(1)), Applied::Updated);
        assert_eq!(state.apply(2, Ok(2)), Applied::Updated);
        assert_eq!(state.current().as_deref(), Some(&2));
    }

    #[test]
    fn older_result_is_stale() {
        let state = ViewState::new("orders");
        assert_eq!(state.apply(3, Ok("fast")), Applied::Updated);
        assert_eq!(state.apply(2, Ok("slow")), Applied::Stale);
        assert_eq!(state.apply(3, Ok("dup")), Applied::Stale);
        assert_eq!(state.current().as_deref(), Some(&"fast"));
    }

    #[test]
    fn failure_keeps_data_and_records_error() {
        let state = ViewState::new("vendors");
        state.apply(1, Ok(vec![1, 2]));
        assert_eq!(state.apply(2, Err(failure())), Applied::Failed);

        let snap = state.snapshot();
        assert_eq!(snap.data.as_deref(), Some(&vec![1, 2]));
        assert_eq!(snap.last_error, Some(failure()));
        assert_eq!(snap.consecutive_failures, 1);

        state.apply(3, Ok(vec![3]));
        assert!(state.last_error().is_none());
        assert_eq!(state.snapshot().consecutive_failures, 0);
    }

    #[test]
    fn detached_view_ignores_everything() {
        let state = ViewState::new("partners");
        state.detach();
        state.detach();
        assert_eq!(state.apply(1, Ok(())), Applied::Detached);
        assert!(state.current().is_none());
    }

    #[test]
    fn version_bumps_on_each_change() {
        let state = ViewState::new("earnings");
        let rx = state.subscribe();
        state.apply(1, Ok(0));
        state.apply(2, Err(failure()));
        state.apply(1, Ok(9));
        assert_eq!(*rx.borrow(), 2);
    }
}
