//! Lenient numeric field
//!
//! Amounts, prices and ratings arrive as decimal strings (`"12.50"`), bare
//! JSON numbers, or null. [`Numeric`] keeps the text the backend sent and
//! the parsed value, if any. Sums use [`Numeric::or_zero`]; averages use
//! [`Numeric::value`] and skip `None`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A number that may have arrived as text, a JSON number, or nothing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Numeric {
    text: Option<String>,
    value: Option<f64>,
}

impl Numeric {
    /// Parse backend text. Non-numeric and non-finite input yields no value.
    #[must_use]
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let value = text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite());
        Self {
            text: Some(text),
            value,
        }
    }

    /// Wrap an already numeric value
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Self {
            text: Some(value.to_string()),
            value: Some(value).filter(|v| v.is_finite()),
        }
    }

    /// A field that was null or absent
    #[inline]
    #[must_use]
    pub const fn missing() -> Self {
        Self {
            text: None,
            value: None,
        }
    }

    /// Parsed value, `None` when missing or non-numeric
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Parsed value with missing and non-numeric input counted as zero
    #[inline]
    #[must_use]
    pub fn or_zero(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }

    /// Whether the backend sent anything at all (even garbage)
    #[inline]
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.text.is_some()
    }

    /// Text exactly as received
    #[inline]
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<&str> for Numeric {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text.as_deref().unwrap_or(""))
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.text {
            Some(text) => serializer.serialize_str(text),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericVisitor)
    }
}

struct NumericVisitor;

impl<'de> Visitor<'de> for NumericVisitor {
    type Value = Numeric;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, numeric string or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Numeric, E> {
        Ok(Numeric::parse(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Numeric, E> {
        Ok(Numeric::parse(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Numeric, E> {
        Ok(Numeric::from_f64(v))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Numeric, E> {
        Ok(Numeric {
            text: Some(v.to_string()),
            value: Some(v as f64),
        })
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Numeric, E> {
        Ok(Numeric {
            text: Some(v.to_string()),
            value: Some(v as f64),
        })
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Numeric, E> {
        Ok(Numeric {
            text: Some(v.to_string()),
            value: None,
        })
    }

    fn visit_unit<E: de::Error>(self) -> Result<Numeric, E> {
        Ok(Numeric::missing())
    }

    fn visit_none<E: de::Error>(self) -> Result<Numeric, E> {
        Ok(Numeric::missing())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Numeric, D::Error> {
        deserializer.deserialize_any(self)
    }
}
