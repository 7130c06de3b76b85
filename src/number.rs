//! Canonical decimal text for numbers.
//!
//! Every number that ends up in an emitted document or in generated source
//! text goes through [`number_to_text`], so the same value always prints the
//! same way.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Smallest magnitude printed in plain decimal notation
const MIN_PLAIN: f64 = 1e-6;

/// Magnitudes at or above this switch to exponent notation
const MAX_PLAIN: f64 = 1e15;

/// Converts a number to its shortest canonical decimal text. The text
/// always parses back to the same `f64`.
///
/// # Examples
///
/// ```
/// use simchange::number::number_to_text;
///
/// assert_eq!(number_to_text(5.0), "5");
/// assert_eq!(number_to_text(0.1), "0.1");
/// assert_eq!(number_to_text(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(number_to_text(-2.5), "-2.5");
/// assert_eq!(number_to_text(1e-7), "1e-7");
/// assert_eq!(number_to_text(f64::INFINITY), "INF");
/// ```
pub fn number_to_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if !(MIN_PLAIN..MAX_PLAIN).contains(&magnitude) {
        return format!("{:e}", value);
    }

    // `to_string` gives the shortest digits that read back as `value`
    let shortest = value.to_string();
    match Decimal::from_str(&shortest) {
        Ok(decimal) => decimal.normalize().to_string(),
        Err(_) => shortest,
    }
}

/// Joins numbers with `", "`, each in canonical form.
pub fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| number_to_text(*v))
        .collect::<Vec<_>>()
        .join(", ")
}
