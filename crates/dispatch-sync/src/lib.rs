//! Dispatch Sync
//!
//! Keeps console views fresh. A [`Poller`] runs a view's [`Refresh`]
//! routine immediately and then on a fixed interval, feeding results into
//! a [`ViewState`]:
//! - every cycle carries a sequence number; results older than the last
//!   applied one are dropped
//! - a failed cycle keeps the previous data and records the error
//! - [`PollerHandle::stop`] detaches the view, aborts in-flight cycles and
//!   waits for the loop to exit
//!
//! # Example
//!
//! ```rust
//! use dispatch_client::ApiError;
//! use dispatch_sync::{FnRefresh, Poller, PollerConfig};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let poller = Poller::spawn(
//!     FnRefresh::new("clock", || async { Ok::<_, ApiError>(42_u32) }),
//!     PollerConfig::every(Duration::from_secs(10)),
//! );
//! let mut changes = poller.subscribe();
//! changes.changed().await.unwrap();
//! assert_eq!(poller.state().current().as_deref(), Some(&42));
//! poller.stop().await;
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod poller;
mod refresh;
mod state;

pub use poller::{OverlapPolicy, Poller, PollerConfig, PollerHandle, MIN_INTERVAL};
pub use refresh::{FnRefresh, Refresh};
pub use state::{Applied, Snapshot, ViewState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
