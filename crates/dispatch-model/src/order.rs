//! Orders and the kitchen progression
//!
//! The backend owns the order lifecycle. The console only reads orders and
//! requests one forward step at a time along
//! `pending -> preparing -> ready -> out_for_delivery`.

use crate::ids::{OrderId, UserId, VendorId};
use crate::lenient::null_as_default;
use crate::numeric::Numeric;
use crate::timestamp::lenient_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum OrderStatus {
    /// Placed, not yet accepted
    Pending,
    /// Accepted by the vendor
    Confirmed,
    /// In the kitchen
    Preparing,
    /// Waiting for pickup
    Ready,
    /// Handed to a partner
    OutForDelivery,
    /// Delivered to the customer
    Delivered,
    /// Any status this console does not know about, kept verbatim
    Other(String),
}

impl OrderStatus {
    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Other(s) => s,
        }
    }

    /// Whether the order still needs vendor attention
    ///
    /// `out_for_delivery` is deliberately outside this bucket.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Confirmed | Self::Preparing | Self::Ready
        )
    }

    /// Whether the order has been delivered
    #[inline]
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Next step on the kitchen board, if this status has one
    #[must_use]
    pub fn next_step(&self) -> Option<OrderStatus> {
        match self {
            Self::Pending => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::OutForDelivery),
            _ => None,
        }
    }

    /// Human label with underscores replaced, e.g. `out for delivery`
    #[must_use]
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "preparing" => Self::Preparing,
            "ready" => Self::Ready,
            "out_for_delivery" => Self::OutForDelivery,
            "delivered" => Self::Delivered,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Option<String>> for OrderStatus {
    fn from(raw: Option<String>) -> Self {
        raw.map_or_else(Self::default, Self::from)
    }
}

impl Default for OrderStatus {
    /// Empty status, used for null or missing values; in no bucket
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order id
    pub id: OrderId,
    /// Owning vendor
    #[serde(default, deserialize_with = "null_as_default")]
    pub vendor_id: VendorId,
    /// Ordering customer
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_id: UserId,
    /// Order total, usually a decimal string
    #[serde(default)]
    pub total_amount: Numeric,
    /// Lifecycle status
    #[serde(default)]
    pub status: OrderStatus,
    /// Creation time, `None` when absent or unparseable
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Customer display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

impl Order {
    /// Customer name with the board's fallback
    #[must_use]
    pub fn customer_label(&self) -> &str {
        self.customer_name.as_deref().unwrap_or("Guest User")
    }
}

/// Body of `PATCH /orders/:id` and `PATCH /vendors/:id/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Requested status
    pub status: String,
}

impl StatusUpdate {
    /// Build a status change request
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kitchen_progression_is_linear() {
        assert_eq!(OrderStatus::Pending.next_step(), Some(OrderStatus::Preparing));
        assert_eq!(OrderStatus::Preparing.next_step(), Some(OrderStatus::Ready));
        assert_eq!(OrderStatus::Ready.next_step(), Some(OrderStatus::OutForDelivery));

        assert_eq!(OrderStatus::Confirmed.next_step(), None);
        assert_eq!(OrderStatus::OutForDelivery.next_step(), None);
        assert_eq!(OrderStatus::Delivered.next_step(), None);
        assert_eq!(OrderStatus::from("cancelled").next_step(), None);
    }

    #[test]
    fn out_for_delivery_is_neither_open_nor_delivered() {
        let status = OrderStatus::OutForDelivery;
        assert!(!status.is_open());
        assert!(!status.is_delivered());
    }

    #[test]
    fn unknown_status_round_trips_verbatim() {
        let status: OrderStatus = serde_json::from_str("\"refunded\"").unwrap();
        assert_eq!(status, OrderStatus::Other("refunded".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"refunded\"");
    }

    #[test]
    fn decodes_backend_order() {
        let order: Order = serde_json::from_str(
            r#"{
                "id": "9d1c7a44-0000",
                "vendor_id": "v-1",
                "customer_id": "c-7",
                "total_amount": "249.00",
                "status": "out_for_delivery",
                "created_at": "2026-10-01T08:00:00.000Z",
                "customer_name": null
            }"#,
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::OutForDelivery);
        assert_eq!(order.total_amount.value(), Some(249.0));
        assert!(order.created_at.is_some());
        assert_eq!(order.customer_label(), "Guest User");
        assert_eq!(order.status.label(), "out for delivery");
    }

    #[test]
    fn null_status_and_references_decode_into_no_bucket() {
        let orders: Vec<Order> = serde_json::from_str(
            r#"[
                {"id":"o-1","vendor_id":"v-1","total_amount":"10","status":"delivered"},
                {"id":"o-2","vendor_id":null,"customer_id":null,"total_amount":"5","status":null},
                {"id":"o-3","total_amount":"7"}
            ]"#,
        )
        .unwrap();

        assert_eq!(orders.len(), 3);
        assert_eq!(orders[1].status, OrderStatus::default());
        assert_eq!(orders[2].status, OrderStatus::default());
        assert_eq!(orders[1].vendor_id.as_str(), "");
        for order in &orders[1..] {
            assert!(!order.status.is_open());
            assert!(!order.status.is_delivered());
            assert_eq!(order.status.next_step(), None);
        }
    }
}
