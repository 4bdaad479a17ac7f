//! Fixed-point display helpers

use dispatch_model::Numeric;

/// Format `value` with exactly `places` decimals, never as `-0.00` or `NaN`
#[must_use]
pub fn fixed(value: f64, places: usize) -> String {
    let value = if value.is_finite() && value != 0.0 {
        value
    } else {
        0.0
    };
    let text = format!("{value:.places$}");
    match text.strip_prefix('-') {
        Some(digits) if digits.chars().all(|c| c == '0' || c == '.') => digits.to_string(),
        _ => text,
    }
}

/// Sum amounts, counting missing or non-numeric entries as zero
pub fn sum_amounts<'a>(amounts: impl IntoIterator<Item = &'a Numeric>) -> f64 {
    amounts.into_iter().map(Numeric::or_zero).sum()
}
