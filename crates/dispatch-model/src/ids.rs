//! Record identifiers
//!
//! The backend hands out UUID strings for most records, but older fixtures
//! use plain integers. Every id type accepts either and keeps the text form.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(String);

        impl $name {
            /// Wrap an id as received from the backend
            #[inline]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Id as sent on the wire
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Leading characters used for display, e.g. `#3f2a9c1b`
            #[must_use]
            pub fn short(&self, len: usize) -> &str {
                match self.0.char_indices().nth(len) {
                    Some((idx, _)) => &self.0[..idx],
                    None => &self.0,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(IdVisitor).map(Self)
            }
        }
    };
}

struct IdVisitor;

impl Visitor<'_> for IdVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }
}

record_id!(
    /// Order identifier
    OrderId
);
record_id!(
    /// Vendor identifier
    VendorId
);
record_id!(
    /// Account identifier (customers, vendor admins, platform admins)
    UserId
);
record_id!(
    /// Catalog product identifier
    ProductId
);
record_id!(
    /// Logistics package identifier
    PackageId
);
record_id!(
    /// Delivery partner identifier
    PartnerId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_string_and_integer_ids() {
        let a: OrderId = serde_json::from_str("\"3f2a9c1b-77\"").unwrap();
        let b: PartnerId = serde_json::from_str("42").unwrap();

        assert_eq!(a.as_str(), "3f2a9c1b-77");
        assert_eq!(b.as_str(), "42");
    }

    #[test]
    fn short_form_truncates_on_char_boundary() {
        let id = OrderId::new("3f2a9c1b-77aa");
        assert_eq!(id.short(8), "3f2a9c1b");
        assert_eq!(OrderId::new("ab").short(8), "ab");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&VendorId::new("v-9")).unwrap();
        assert_eq!(json, "\"v-9\"");
    }
}
