//! Interval-driven refresh loop with cooperative teardown

use crate::refresh::Refresh;
use crate::state::{Applied, ViewState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// What to do when a tick fires while an earlier cycle is still running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Start another cycle; late results are discarded by sequence number
    #[default]
    Allow,
    /// Skip the tick
    Skip,
}

/// Shortest interval a poller will tick at
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Poller settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Time between cycle starts
    pub interval: Duration,
    /// Overlap handling
    pub overlap: OverlapPolicy,
}

impl PollerConfig {
    /// Poll every `interval` with the default overlap policy
    ///
    /// Intervals shorter than [`MIN_INTERVAL`] are raised to it.
    #[must_use]
    pub fn every(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            overlap: OverlapPolicy::default(),
        }
    }

    /// With overlap policy
    #[must_use]
    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }
}

/// Spawns refresh loops
pub struct Poller;

impl Poller {
    /// Start polling `refresh`
    ///
    /// The first cycle starts immediately, then one per interval until the
    /// returned handle is stopped or dropped. Must be called inside a tokio
    /// runtime.
    pub fn spawn<R: Refresh>(refresh: R, config: PollerConfig) -> PollerHandle<R::Output> {
        let state = Arc::new(ViewState::new(refresh.name()));
        let (shutdown, shutdown_rx) = watch::channel(false);
        let trigger = Arc::new(Notify::new());

        info!(
            view = %state.name(),
            interval_ms = u64::try_from(config.interval.as_millis()).unwrap_or(u64::MAX),
            overlap = ?config.overlap,
            "poller started"
        );

        let task = tokio::spawn(run(
            Arc::new(refresh),
            Arc::clone(&state),
            config,
            shutdown_rx,
            Arc::clone(&trigger),
        ));

        PollerHandle {
            state,
            shutdown,
            trigger,
            task: Some(task),
        }
    }
}

async fn run<R: Refresh>(
    refresh: Arc<R>,
    state: Arc<ViewState<R::Output>>,
    config: PollerConfig,
    mut shutdown: watch::Receiver<bool>,
    trigger: Arc<Notify>,
) {
    let mut ticker = interval(config.interval.max(MIN_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight = JoinSet::new();
    let mut seq: u64 = 0;

    loop {
        let start = tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                false
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(err) = joined {
                    if err.is_panic() {
                        error!(view = %state.name(), "refresh cycle panicked");
                    }
                }
                false
            }
            () = trigger.notified() => true,
            _ = ticker.tick() => {
                if config.overlap == OverlapPolicy::Skip && !in_flight.is_empty() {
                    debug!(view = %state.name(), "cycle in flight, skipping tick");
                    false
                } else {
                    true
                }
            }
        };

        if start {
            seq += 1;
            let cycle = seq;
            let refresh = Arc::clone(&refresh);
            let state = Arc::clone(&state);
            in_flight.spawn(async move {
                debug!(view = %state.name(), seq = cycle, "refresh cycle started");
                let result = refresh.refresh().await;
                if state.apply(cycle, result) == Applied::Updated {
                    debug!(view = %state.name(), seq = cycle, "snapshot updated");
                }
            });
        }
    }

    state.detach();
    in_flight.shutdown().await;
    debug!(view = %state.name(), cycles = seq, "poller loop exited");
}

/// Owner of a running poller
///
/// Dropping the handle tears the poller down as [`stop`] does, without
/// waiting for it.
///
/// [`stop`]: PollerHandle::stop
pub struct PollerHandle<T> {
    state: Arc<ViewState<T>>,
    shutdown: watch::Sender<bool>,
    trigger: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl<T> PollerHandle<T> {
    /// The view state this poller feeds
    #[must_use]
    pub fn state(&self) -> &Arc<ViewState<T>> {
        &self.state
    }

    /// Receiver that changes whenever the view state does
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.state.subscribe()
    }

    /// Start a cycle now, outside the interval
    ///
    /// Used after a mutation so the affected list reloads immediately.
    pub fn refresh_now(&self) {
        self.trigger.notify_one();
    }

    /// Tear the poller down and wait until it has exited
    ///
    /// No timer tick starts a cycle afterwards, in-flight cycles are
    /// aborted, and any result that still arrives is ignored.
    pub async fn stop(mut self) {
        self.signal_stop();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                if err.is_panic() {
                    error!(view = %self.state.name(), "poller loop panicked");
                }
            }
        }
        info!(view = %self.state.name(), "poller stopped");
    }

    fn signal_stop(&self) {
        self.state.detach();
        // Receiver gone means the loop already exited.
        let _ = self.shutdown.send(true);
    }
}

impl<T> Drop for PollerHandle<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            self.signal_stop();
            task.abort();
        }
    }
}

impl<T> std::fmt::Debug for PollerHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollerHandle")
            .field("state", &self.state)
            .field("running", &self.task.is_some())
            .finish_non_exhaustive()
    }
}
