//! Dispatch Client
//!
//! Typed access to the delivery platform backend. Every call goes through
//! one transport with one error taxonomy:
//! - [`ApiError::NetworkUnavailable`]: no HTTP answer
//! - [`ApiError::RequestFailed`]: non-2xx status or an error envelope
//! - [`ApiError::ValidationRejected`]: payload failed local checks, nothing sent
//! - [`ApiError::MalformedResponse`]: body did not decode
//!
//! [`ConsoleApi`] is the seam views and mutation flows depend on;
//! [`ApiClient`] implements it over HTTP.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod api;
mod client;
mod config;
mod error;

pub use api::ConsoleApi;
pub use client::{acknowledged, list_data, required_data, resource_path, ApiClient};
pub use config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ApiError, ApiResult};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
