//! Vendors and vendor statistics

use crate::ids::{UserId, VendorId};
use crate::lenient::null_as_default;
use crate::numeric::Numeric;
use crate::session::ServiceType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vendor onboarding status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum VendorStatus {
    /// Awaiting platform approval
    Pending,
    /// Approved and trading
    Active,
    /// Temporarily blocked
    Suspended,
    /// Application declined
    Rejected,
    /// Unrecognised status, kept verbatim
    Other(String),
}

impl VendorStatus {
    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Rejected => "rejected",
            Self::Other(s) => s,
        }
    }

    /// Approval is the only transition the console exposes
    #[inline]
    #[must_use]
    pub fn can_approve(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Capitalised label, e.g. `Pending`
    #[must_use]
    pub fn label(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<String> for VendorStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => Self::Pending,
            "active" => Self::Active,
            "suspended" => Self::Suspended,
            "rejected" => Self::Rejected,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for VendorStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Option<String>> for VendorStatus {
    fn from(raw: Option<String>) -> Self {
        raw.map_or_else(Self::default, Self::from)
    }
}

impl Default for VendorStatus {
    /// Empty status, used for null or missing values
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<VendorStatus> for String {
    fn from(status: VendorStatus) -> Self {
        match status {
            VendorStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vendor storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    /// Vendor id
    pub id: VendorId,
    /// Trading name
    #[serde(default, deserialize_with = "null_as_default")]
    pub business_name: String,
    /// Cuisine for food vendors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    /// Logo image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Onboarding status
    #[serde(default)]
    pub status: VendorStatus,
    /// Average customer rating; `None` when the vendor has no rating yet
    #[serde(default)]
    pub rating: Option<Numeric>,
    /// Free text, sometimes a JSON blob packed at signup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning vendor-admin account
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: UserId,
    /// Food or logistics
    #[serde(default)]
    pub service_type: ServiceType,
}

impl Vendor {
    /// Rating for display, `N/A` when absent
    #[must_use]
    pub fn rating_label(&self) -> String {
        match self.rating.as_ref().and_then(Numeric::value) {
            Some(r) => format!("{r:.1}"),
            None => "N/A".to_string(),
        }
    }

    /// Case-insensitive match on name or cuisine
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.business_name.to_lowercase().contains(&needle)
            || self
                .cuisine_type
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&needle))
    }
}

/// Payload of `GET /vendor/:id/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorStats {
    /// Earnings booked today
    #[serde(default)]
    pub today_earnings: Numeric,
    /// Orders still waiting on the vendor
    #[serde(default)]
    pub orders_to_fulfill: u64,
    /// Store rating
    #[serde(default)]
    pub rating: Numeric,
    /// Products currently listed
    #[serde(default)]
    pub active_products: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_vendors_can_be_approved() {
        assert!(VendorStatus::Pending.can_approve());
        assert!(!VendorStatus::Active.can_approve());
        assert!(!VendorStatus::Suspended.can_approve());
        assert!(!VendorStatus::Rejected.can_approve());
    }

    #[test]
    fn decodes_vendor_with_null_rating() {
        let vendor: Vendor = serde_json::from_str(
            r#"{"id":"v-1","business_name":"Apollo Tacos","status":"pending",
                "rating":null,"user_id":"u-1","service_type":"food"}"#,
        )
        .unwrap();

        assert!(vendor.rating.is_none());
        assert_eq!(vendor.rating_label(), "N/A");
        assert_eq!(vendor.status.label(), "Pending");
    }

    #[test]
    fn search_matches_name_and_cuisine() {
        let vendor: Vendor = serde_json::from_str(
            r#"{"id":"v-1","business_name":"Apollo Tacos","cuisine_type":"Mexican",
                "status":"active","rating":"4.26"}"#,
        )
        .unwrap();

        assert!(vendor.matches("apollo"));
        assert!(vendor.matches("MEX"));
        assert!(!vendor.matches("sushi"));
        assert_eq!(vendor.rating_label(), "4.3");
    }

    #[test]
    fn null_fields_do_not_fail_the_record() {
        let vendor: Vendor = serde_json::from_str(
            r#"{"id":"v-2","business_name":null,"status":null,"user_id":null,
                "service_type":null}"#,
        )
        .unwrap();

        assert_eq!(vendor.status, VendorStatus::default());
        assert!(!vendor.status.can_approve());
        assert_eq!(vendor.status.label(), "");
        assert_eq!(vendor.business_name, "");
        assert_eq!(vendor.service_type, ServiceType::Food);
    }

    #[test]
    fn unknown_service_type_reads_as_food() {
        let vendor: Vendor = serde_json::from_str(
            r#"{"id":"v-3","business_name":"Corner Shop","status":"active",
                "service_type":"grocery"}"#,
        )
        .unwrap();

        assert_eq!(vendor.service_type, ServiceType::Food);
    }
}
