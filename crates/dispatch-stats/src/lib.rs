//! Dispatch Stats
//!
//! Pure functions that reduce raw record lists into the figures shown on
//! console dashboards:
//! - [`summarize_orders`]: order counts by bucket and delivered revenue
//! - [`summarize_vendors`]: vendor counts and mean rating
//! - [`summarize_earnings`]: vendor earnings over trailing windows
//! - [`summarize_partners`]: fleet availability
//!
//! Every aggregator accepts an empty slice and returns zeroed, formatted
//! figures. Monetary inputs that fail to parse count as zero.
//!
//! # Example
//!
//! ```rust
//! use dispatch_model::Order;
//! use dispatch_stats::summarize_orders;
//!
//! let orders: Vec<Order> = serde_json::from_str(r#"[
//!     {"id":"a","total_amount":"10.00","status":"delivered"},
//!     {"id":"b","total_amount":"5.5","status":"pending"}
//! ]"#).unwrap();
//!
//! let stats = summarize_orders(&orders);
//! assert_eq!((stats.total, stats.pending, stats.completed), (2, 1, 1));
//! assert_eq!(stats.revenue, "10.00");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod earnings;
mod format;
mod orders;
mod partners;
mod vendors;

pub use earnings::{
    recent_transactions, summarize_earnings, EarningsSummary, EarningsWindow, Transaction,
    RECENT_TRANSACTIONS,
};
pub use format::{fixed, sum_amounts};
pub use orders::{
    active_orders, order_board, summarize_orders, BoardColumn, OrderBoard, OrderStats,
    ACTIVE_ORDERS_SHOWN,
};
pub use partners::{summarize_partners, PartnerStats};
pub use vendors::{summarize_vendors, VendorSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
