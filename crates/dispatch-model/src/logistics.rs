//! Logistics packages and delivery partners

use crate::ids::{PackageId, PartnerId};
use crate::lenient::null_as_default;
use crate::numeric::Numeric;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parcel moving between two addresses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Package id
    pub id: PackageId,
    /// Pickup address
    #[serde(default, deserialize_with = "null_as_default")]
    pub pickup_location: String,
    /// Dropoff address
    #[serde(default, deserialize_with = "null_as_default")]
    pub dropoff_location: String,
    /// Contents description
    #[serde(default, deserialize_with = "null_as_default")]
    pub package_details: String,
    /// Quoted price
    #[serde(default)]
    pub price: Numeric,
    /// Backend status (`available`, `picked_up`, `in_transit`, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Assigned partner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_name: Option<String>,
}

impl Package {
    /// First comma-separated segment of the pickup address
    #[must_use]
    pub fn pickup_area(&self) -> &str {
        first_segment(&self.pickup_location)
    }

    /// First comma-separated segment of the dropoff address
    #[must_use]
    pub fn dropoff_area(&self) -> &str {
        first_segment(&self.dropoff_location)
    }

    /// Assigned partner or `Unassigned`
    #[must_use]
    pub fn partner_label(&self) -> &str {
        self.partner_name.as_deref().unwrap_or("Unassigned")
    }
}

fn first_segment(address: &str) -> &str {
    address.split(',').next().unwrap_or(address).trim()
}

/// Partner availability
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum PartnerStatus {
    /// Available for assignment
    Online,
    /// Carrying an order
    Busy,
    /// Off shift
    Offline,
    /// Unrecognised status, kept verbatim
    Other(String),
}

impl PartnerStatus {
    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Online => "Online",
            Self::Busy => "Busy",
            Self::Offline => "Offline",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for PartnerStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Online" => Self::Online,
            "Busy" => Self::Busy,
            "Offline" => Self::Offline,
            _ => Self::Other(s),
        }
    }
}

impl From<Option<String>> for PartnerStatus {
    fn from(raw: Option<String>) -> Self {
        raw.map_or_else(Self::default, Self::from)
    }
}

impl Default for PartnerStatus {
    /// Empty status, used for null or missing values
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<PartnerStatus> for String {
    fn from(status: PartnerStatus) -> Self {
        match status {
            PartnerStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PartnerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A delivery rider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPartner {
    /// Partner id
    pub id: PartnerId,
    /// Display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Availability
    #[serde(default)]
    pub status: PartnerStatus,
    /// Order currently carried
    #[serde(
        default,
        rename = "currentOrder",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_order: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_area_is_first_address_segment() {
        let pkg: Package = serde_json::from_str(
            r#"{"id":"p-1","pickup_location":"12 Baker St, Chennai",
                "dropoff_location":"Anna Nagar","package_details":"Docs",
                "price":"80","status":"available"}"#,
        )
        .unwrap();

        assert_eq!(pkg.pickup_area(), "12 Baker St");
        assert_eq!(pkg.dropoff_area(), "Anna Nagar");
        assert_eq!(pkg.partner_label(), "Unassigned");
    }

    #[test]
    fn decodes_partner_with_camel_case_order() {
        let partner: DeliveryPartner = serde_json::from_str(
            r##"{"id":2,"name":"Mike Ross","status":"Busy","currentOrder":"#ORD-123"}"##,
        )
        .unwrap();

        assert_eq!(partner.status, PartnerStatus::Busy);
        assert_eq!(partner.current_order.as_deref(), Some("#ORD-123"));
        assert_eq!(partner.id.as_str(), "2");
    }

    #[test]
    fn null_statuses_and_text_fields_decode() {
        let pkg: Package = serde_json::from_str(
            r#"{"id":"p-2","pickup_location":null,"dropoff_location":"Adyar",
                "package_details":null,"price":null,"status":null}"#,
        )
        .unwrap();
        assert_eq!(pkg.status, "");
        assert_eq!(pkg.pickup_area(), "");

        let partner: DeliveryPartner =
            serde_json::from_str(r#"{"id":"d-1","name":null,"status":null}"#).unwrap();
        assert_eq!(partner.status, PartnerStatus::default());
        assert_eq!(partner.name, "");
    }
}
