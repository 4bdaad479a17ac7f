//! Dispatch Test Utils
//!
//! Shared test support for the dispatch crates:
//! - [`fixtures`]: record builders
//! - [`FakeApi`]: an in-memory [`dispatch_client::ConsoleApi`] with queued
//!   failures, latency and a call log

#![warn(missing_docs)]
#![allow(clippy::missing_panics_doc, clippy::must_use_candidate)]

pub mod fixtures;
mod fake;

pub use fake::{Call, Endpoint, FakeApi};
