//! Dispatch Model
//!
//! Wire types shared by every layer of the console:
//! - Orders and their kitchen progression
//! - Vendors and the approval transition
//! - Logistics packages and delivery partners
//! - Catalog products
//! - Session users and auth payloads
//! - The `{ status, data, error }` response envelope
//!
//! The backend sends monetary values and ratings as strings, numbers or
//! null; [`Numeric`] absorbs all of them so arithmetic never sees a parse
//! failure.
//!
//! # Example
//!
//! ```rust
//! use dispatch_model::{Order, OrderStatus};
//!
//! let order: Order = serde_json::from_str(
//!     r#"{"id":"o-1","vendor_id":"v-1","customer_id":"c-1",
//!         "total_amount":"12.50","status":"pending",
//!         "created_at":"2026-10-01T09:30:00Z"}"#,
//! ).unwrap();
//!
//! assert_eq!(order.status, OrderStatus::Pending);
//! assert_eq!(order.total_amount.or_zero(), 12.5);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod auth;
mod catalog;
mod envelope;
mod ids;
mod lenient;
mod logistics;
mod numeric;
mod order;
mod session;
mod timestamp;
mod vendor;

pub use auth::{
    AuthReply, Credentials, OtpRequest, OtpVerification, RegistrationDetails, SignupRequest,
};
pub use catalog::{Product, ProductDraft};
pub use envelope::{Envelope, EnvelopeStatus};
pub use ids::{OrderId, PackageId, PartnerId, ProductId, UserId, VendorId};
pub use logistics::{DeliveryPartner, Package, PartnerStatus};
pub use numeric::Numeric;
pub use order::{Order, OrderStatus, StatusUpdate};
pub use session::{Role, ServiceType, SessionUser};
pub use timestamp::lenient_timestamp;
pub use vendor::{Vendor, VendorStats, VendorStatus};

/// Errors raised while building outbound payloads
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A required field was left empty
    #[error("required field missing: {0}")]
    MissingField(&'static str),

    /// A field holds a value the backend would reject
    #[error("invalid value for {field}: {reason}")]
    InvalidField {
        /// Field name as sent on the wire
        field: &'static str,
        /// Human readable reason
        reason: String,
    },
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
