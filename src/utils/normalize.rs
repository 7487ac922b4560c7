//! Value normalization for spreadsheet cells and rating strings.
//!
//! Spreadsheet exports hand back a mix of blanks, `NaN`, `null`, numbers and
//! strings padded with invisible characters. Everything that reaches a
//! template goes through [`clean`] first.

use serde_json::Value;

/// Rating used when a hero rating cannot be parsed.
pub const FALLBACK_RATING: f64 = 4.5;

/// Bucket used when a rating is empty or unparseable.
pub const DEFAULT_RATING_CLASS: &str = "rating-4-5";

const INVISIBLE: &[char] = &['\u{200b}', '\u{200c}', '\u{200d}', '\u{2060}', '\u{feff}'];

const NULL_TOKENS: [&str; 3] = ["nan", "null", "none"];

/// Trim a cell value and blank out null-like tokens.
///
/// Invisible characters are removed before trimming so the result is stable
/// under repeated application.
pub fn clean(value: &str) -> String {
    let stripped: String = value.chars().filter(|c| !INVISIBLE.contains(c)).collect();
    let trimmed = stripped.trim();

    if NULL_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
    {
        return String::new();
    }

    trimmed.to_string()
}

/// [`clean`] for an optional string.
pub fn clean_opt(value: Option<&str>) -> String {
    value.map(clean).unwrap_or_default()
}

/// [`clean`] for an arbitrary JSON scalar. Absent, null and NaN become empty.
pub fn clean_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => clean(s),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.is_nan() => String::new(),
            _ => clean(&n.to_string()),
        },
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => clean(&other.to_string()),
    }
}

/// Parse a decimal number accepting either `.` or `,` as separator.
pub fn parse_decimal(value: &str) -> Option<f64> {
    value.trim().replace(',', ".").parse::<f64>().ok()
}

/// Round to two decimal places.
///
/// Goes through the fixed-precision formatter, which rounds the exact binary
/// value, so `20.125` (stored slightly below) becomes `20.12`.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse::<f64>().unwrap_or(value)
}

/// Format a float the way the published pages always showed it: integral
/// values keep one decimal (`90.0`), everything else uses the shortest form.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Convert a 0–5 rating to a CSS width such as `"86.0%"`.
///
/// Out-of-range values are clamped; unparseable input falls back to 4.5.
pub fn rating_to_percent_str(value: &str) -> String {
    let rating = parse_decimal(value)
        .filter(|f| !f.is_nan())
        .map(|f| f.clamp(0.0, 5.0))
        .unwrap_or(FALLBACK_RATING);

    format!("{}%", format_float(round2(rating / 5.0 * 100.0)))
}

/// Convert a 0–5 rating into a star bucket class (`rating-4-5`, `rating-5`, ...).
///
/// Fractions in `[0.5, 0.75)` map to the half bucket. Fractions at or above
/// 0.75 stay in the whole bucket unless the rating reaches 4.75.
pub fn rating_to_class(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return DEFAULT_RATING_CLASS.to_string();
    }

    let rating = match parse_decimal(trimmed).filter(|f| !f.is_nan()) {
        Some(f) => f.clamp(0.0, 5.0),
        None => return DEFAULT_RATING_CLASS.to_string(),
    };

    if rating >= 4.75 {
        return "rating-5".to_string();
    }

    let whole = rating.floor();
    let fraction = rating - whole;
    let half = fraction >= 0.5 - 1e-6 && fraction < 0.75;

    if half && whole < 5.0 {
        format!("rating-{}-5", whole as u8)
    } else {
        format!("rating-{}", whole as u8)
    }
}

/// Percent used by the review star widget.
///
/// Unlike [`rating_to_percent_str`] there is no clamping and an unparseable
/// rating yields `0`.
pub fn review_percent(value: &str) -> String {
    match parse_decimal(value) {
        Some(f) => format_float(round2(f / 5.0 * 100.0)),
        None => "0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_handles_absent_and_null_tokens() {
        assert_eq!(clean_value(None), "");
        assert_eq!(clean_value(Some(&Value::Null)), "");
        assert_eq!(clean("NaN"), "");
        assert_eq!(clean("null"), "");
        assert_eq!(clean(" None "), "");
    }

    #[test]
    fn clean_strips_invisible_characters() {
        assert_eq!(clean("  x\u{200b} "), "x");
        assert_eq!(clean("\u{feff}hello"), "hello");
        assert_eq!(clean("\u{200b} x"), "x");
    }

    #[test]
    fn clean_is_idempotent() {
        for input in ["  x\u{200b} ", "\u{200b} nan", " a b ", "\u{feff}\u{200b}", "None"] {
            let once = clean(input);
            assert_eq!(clean(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn clean_value_stringifies_numbers() {
        assert_eq!(clean_value(Some(&json!(4.5))), "4.5");
        assert_eq!(clean_value(Some(&json!(7))), "7");
        assert_eq!(clean_value(Some(&json!(" text "))), "text");
    }

    #[test]
    fn percent_in_range() {
        assert_eq!(rating_to_percent_str("4.5"), "90.0%");
        assert_eq!(rating_to_percent_str("4.3"), "86.0%");
        assert_eq!(rating_to_percent_str("4,33"), "86.6%");
        assert_eq!(rating_to_percent_str("5"), "100.0%");
        assert_eq!(rating_to_percent_str("0"), "0.0%");
    }

    #[test]
    fn percent_keeps_two_decimals() {
        assert_eq!(rating_to_percent_str("4.333"), "86.66%");
        assert_eq!(rating_to_percent_str("1.00625"), "20.12%");
        assert_eq!(rating_to_percent_str("0.00625"), "0.12%");
    }

    #[test]
    fn round2_follows_stored_value_on_ties() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(20.125), 20.12);
        assert_eq!(round2(46.675), 46.67);
        assert_eq!(round2(99.995), 100.0);
    }

    #[test]
    fn percent_clamps_out_of_range() {
        assert_eq!(rating_to_percent_str("7"), "100.0%");
        assert_eq!(rating_to_percent_str("-2"), "0.0%");
    }

    #[test]
    fn percent_falls_back_on_garbage() {
        assert_eq!(rating_to_percent_str("abc"), "90.0%");
        assert_eq!(rating_to_percent_str(""), "90.0%");
    }

    #[test]
    fn class_buckets() {
        assert_eq!(rating_to_class("4.5"), "rating-4-5");
        assert_eq!(rating_to_class("4.9"), "rating-5");
        assert_eq!(rating_to_class("3"), "rating-3");
        assert_eq!(rating_to_class(""), "rating-4-5");
        assert_eq!(rating_to_class("abc"), "rating-4-5");
        assert_eq!(rating_to_class("4,75"), "rating-5");
        assert_eq!(rating_to_class("9"), "rating-5");
    }

    #[test]
    fn class_upper_fraction_stays_in_whole_bucket() {
        assert_eq!(rating_to_class("3.8"), "rating-3");
        assert_eq!(rating_to_class("3.6"), "rating-3-5");
        assert_eq!(rating_to_class("4.7"), "rating-4-5");
        assert_eq!(rating_to_class("2.4"), "rating-2");
    }

    #[test]
    fn review_percent_defaults_to_zero() {
        assert_eq!(review_percent("4.5"), "90.0");
        assert_eq!(review_percent("4,2"), "84.0");
        assert_eq!(review_percent("4.333"), "86.66");
        assert_eq!(review_percent(""), "0");
        assert_eq!(review_percent("great"), "0");
    }
}
