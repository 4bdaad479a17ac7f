//! Session user record

use crate::ids::{UserId, VendorId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Platform owner
    SuperAdmin,
    /// Platform staff
    Admin,
    /// Vendor administrator
    VendorAdmin,
    /// Any other role (customers, partners)
    Other(String),
}

impl Role {
    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::VendorAdmin => "vendor_admin",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "super_admin" => Self::SuperAdmin,
            "admin" => Self::Admin,
            "vendor_admin" => Self::VendorAdmin,
            _ => Self::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of business a vendor runs
///
/// Decoding never fails: null or unrecognised values read as `Food`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum ServiceType {
    /// Restaurants and kitchens
    #[default]
    Food,
    /// Parcel pickup and dropoff
    Logistics,
}

impl From<Option<String>> for ServiceType {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref() {
            Some("logistics") => Self::Logistics,
            _ => Self::Food,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Food => "food",
            Self::Logistics => "logistics",
        })
    }
}

/// The signed-in account, as returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Account id
    pub id: UserId,
    /// Account role
    pub role: Role,
    /// Vendor this account administers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<VendorId>,
    /// Vendor trading name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    /// Food or logistics
    #[serde(default)]
    pub service_type: ServiceType,
    /// Branding logo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Branding accent colour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
    /// Login email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Login phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl SessionUser {
    /// Vendor the account acts for: `vendor_id`, falling back to the account id
    #[must_use]
    pub fn vendor_scope(&self) -> VendorId {
        self.vendor_id
            .clone()
            .unwrap_or_else(|| VendorId::new(self.id.as_str()))
    }

    /// Name shown in the console header
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.business_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Food Delivery")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(json: &str) -> SessionUser {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn vendor_scope_prefers_vendor_id() {
        let u = user(r#"{"id":"u-1","role":"vendor_admin","vendor_id":"v-9"}"#);
        assert_eq!(u.vendor_scope(), VendorId::new("v-9"));
    }

    #[test]
    fn vendor_scope_falls_back_to_account_id() {
        let u = user(r#"{"id":"u-1","role":"vendor_admin"}"#);
        assert_eq!(u.vendor_scope(), VendorId::new("u-1"));
        assert_eq!(u.service_type, ServiceType::Food);
    }

    #[test]
    fn unknown_roles_are_kept() {
        let u = user(r#"{"id":"u-1","role":"customer","service_type":"logistics"}"#);
        assert_eq!(u.role, Role::Other("customer".to_string()));
        assert_eq!(u.service_type, ServiceType::Logistics);
    }

    #[test]
    fn null_or_unknown_service_type_reads_as_food() {
        let u = user(r#"{"id":"u-1","role":"vendor_admin","service_type":null}"#);
        assert_eq!(u.service_type, ServiceType::Food);

        let u = user(r#"{"id":"u-1","role":"vendor_admin","service_type":"grocery"}"#);
        assert_eq!(u.service_type, ServiceType::Food);

        let json = serde_json::to_string(&ServiceType::Logistics).unwrap();
        assert_eq!(json, "\"logistics\"");
    }
}
