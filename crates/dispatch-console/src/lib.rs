//! Dispatch Console
//!
//! Admin and vendor console for the dispatch delivery platform.
//!
//! - [`views`]: what each screen loads, as [`dispatch_sync::Refresh`] routines
//! - [`actions`]: mutations, each followed by a reload of the affected list
//! - [`auth`]: password and one-time-code sign-in, vendor registration
//! - [`session`]: the signed-in user, persisted between invocations
//! - [`render`]: plain-text and JSON output
//! - [`watch`]: live redraw on top of a poller
//!
//! The `dispatch-console` binary wires these to a command line.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod actions;
pub mod auth;
pub mod config;
pub mod confirm;
pub mod error;
pub mod render;
pub mod session;
pub mod views;
pub mod watch;

pub use config::{ConfigError, ConsoleConfig, PollIntervals, ViewKind};
pub use confirm::{AssumeYes, Confirm, TerminalPrompt};
pub use error::{ConsoleError, ConsoleResult};
pub use render::{render, render_snapshot, OutputFormat, Render};
pub use session::{Portal, SessionContext, SessionError, SessionStore};
pub use views::SharedApi;
pub use watch::{watch, WatchOptions};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
