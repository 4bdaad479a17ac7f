//! Vendor aggregation

use crate::format::fixed;
use dispatch_model::{Numeric, Vendor, VendorStatus};
use serde::Serialize;

/// Vendor figures for the admin vendors view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSummary {
    /// All vendors
    pub total: usize,
    /// Approved vendors
    pub active: usize,
    /// Vendors awaiting approval
    pub pending: usize,
    /// Mean rating over rated vendors, one decimal, `"0.0"` when none
    pub avg_rating: String,
}

impl Default for VendorSummary {
    fn default() -> Self {
        summarize_vendors(&[])
    }
}

/// Reduce a vendor list to counts and mean rating
///
/// Vendors with a null rating, or one that does not parse, are left out of
/// both the sum and the count.
#[must_use]
pub fn summarize_vendors(vendors: &[Vendor]) -> VendorSummary {
    let count = |status: VendorStatus| vendors.iter().filter(|v| v.status == status).count();

    let ratings: Vec<f64> = vendors
        .iter()
        .filter_map(|v| v.rating.as_ref().and_then(Numeric::value))
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let avg = if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().sum::<f64>() / ratings.len() as f64
    };

    VendorSummary {
        total: vendors.len(),
        active: count(VendorStatus::Active),
        pending: count(VendorStatus::Pending),
        avg_rating: fixed(avg, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vendors(json: &str) -> Vec<Vendor> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn reference_pair_summarizes() {
        let list = vendors(
            r#"[{"id":"1","business_name":"A","status":"active","rating":"4.0"},
                {"id":"2","business_name":"B","status":"pending","rating":null}]"#,
        );

        assert_eq!(
            summarize_vendors(&list),
            VendorSummary {
                total: 2,
                active: 1,
                pending: 1,
                avg_rating: "4.0".to_string(),
            }
        );
    }

    #[test]
    fn all_null_ratings_average_to_zero() {
        let list = vendors(
            r#"[{"id":"1","business_name":"A","status":"suspended","rating":null},
                {"id":"2","business_name":"B","status":"rejected"}]"#,
        );
        let summary = summarize_vendors(&list);

        assert_eq!(summary.avg_rating, "0.0");
        assert_eq!((summary.active, summary.pending), (0, 0));
    }

    #[test]
    fn empty_list_is_zeroed() {
        let summary = summarize_vendors(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.avg_rating, "0.0");
    }

    #[test]
    fn mixed_rating_encodings_average() {
        let list = vendors(
            r#"[{"id":"1","business_name":"A","status":"active","rating":"4.6"},
                {"id":"2","business_name":"B","status":"active","rating":3},
                {"id":"3","business_name":"C","status":"active","rating":"unrated"}]"#,
        );
        assert_eq!(summarize_vendors(&list).avg_rating, "3.8");
    }
}
