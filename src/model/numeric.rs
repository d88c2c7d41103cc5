//! Lenient numeric coercion.
//!
//! Quantities, prices and the budget are typed by hand, so they are kept as
//! text and coerced on use. Coercion never fails: anything that does not start
//! with a number is worth `0`.

use serde::{Deserialize, Deserializer};

/// Parse the leading numeric prefix of `raw`.
///
/// Leading whitespace is skipped, then the longest `[+-]digits[.digits][e[+-]digits]`
/// prefix is parsed. `"3.50 each"` is `3.5`, `""` and `"abc"` are `0`.
/// Non-finite results are also `0`.
#[must_use]
pub fn parse_number(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut end = 0;

    if end < len && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        mantissa_digits += j - frac_start;
        if mantissa_digits > 0 {
            end = j;
        }
    }

    if mantissa_digits == 0 {
        return 0.0;
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut j = end + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Render a number the way it would be typed back into a field.
#[must_use]
pub fn number_to_text(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        String::new()
    }
}

/// A JSON scalar that may carry a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Number(f64),
    Flag(#[allow(dead_code)] bool),
}

/// Deserialize a string field that clients may also send as a number or null.
///
/// # Errors
///
/// Returns an error only for arrays and objects.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(s)) => s,
        Some(Loose::Number(n)) => number_to_text(n),
        Some(Loose::Flag(_)) | None => String::new(),
    })
}

/// Deserialize a number that clients may send as text, coercing with [`parse_number`].
///
/// # Errors
///
/// Returns an error only for arrays and objects.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64_opt(deserializer)?.unwrap_or(0.0))
}

/// Like [`lenient_f64`], but keeps an explicit `null` distinguishable from a value.
///
/// # Errors
///
/// Returns an error only for arrays and objects.
pub fn lenient_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(s)) => Some(parse_number(&s)),
        Some(Loose::Number(n)) if n.is_finite() => Some(n),
        Some(Loose::Number(_) | Loose::Flag(_)) => Some(0.0),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_number("2"), 2.0);
        assert_eq!(parse_number("3.00"), 3.0);
        assert_eq!(parse_number("  1.5"), 1.5);
        assert_eq!(parse_number("-4"), -4.0);
        assert_eq!(parse_number(".25"), 0.25);
        assert_eq!(parse_number("5."), 5.0);
        assert_eq!(parse_number("1e2"), 100.0);
    }

    #[test]
    fn test_parse_numeric_prefix() {
        assert_eq!(parse_number("3.50 each"), 3.5);
        assert_eq!(parse_number("12abc"), 12.0);
        assert_eq!(parse_number("2e"), 2.0);
        assert_eq!(parse_number("7.5.1"), 7.5);
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number("."), 0.0);
        assert_eq!(parse_number("-"), 0.0);
        assert_eq!(parse_number("$3"), 0.0);
        assert_eq!(parse_number("1e999"), 0.0);
    }

    #[derive(Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "lenient_string")]
        text: String,
        #[serde(default, deserialize_with = "lenient_f64")]
        amount: f64,
    }

    #[test]
    fn test_lenient_fields() {
        let p: Fields = serde_json::from_str(r#"{"text": 2, "amount": "50"}"#).unwrap();
        assert_eq!(p.text, "2");
        assert_eq!(p.amount, 50.0);

        let p: Fields = serde_json::from_str(r#"{"text": null, "amount": 12.5}"#).unwrap();
        assert_eq!(p.text, "");
        assert_eq!(p.amount, 12.5);

        let p: Fields = serde_json::from_str("{}").unwrap();
        assert_eq!(p.text, "");
        assert_eq!(p.amount, 0.0);
    }

    #[test]
    fn test_lenient_fields_flatten_booleans() {
        let p: Fields = serde_json::from_str(r#"{"text": true, "amount": true}"#).unwrap();
        assert_eq!(p.text, "");
        assert_eq!(p.amount, 0.0);

        assert!(serde_json::from_str::<Fields>(r#"{"text": [1]}"#).is_err());
    }
}
