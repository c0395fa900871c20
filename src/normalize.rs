//! Conversion of Last.fm's loosely-typed numeric fields.
//!
//! Last.fm returns counts and durations sometimes as JSON numbers and sometimes as
//! numeric strings, and omits them freely. Everything that leaves this module is
//! either a non-negative integer or `None`.

use serde_json::Value;

/// Normalise a play count field.
///
/// ```rust
/// use melody_scope::normalize::normalize_playcount;
/// use serde_json::json;
///
/// assert_eq!(normalize_playcount(Some(&json!("1234567"))), Some(1234567));
/// assert_eq!(normalize_playcount(Some(&json!(0))), Some(0));
/// assert_eq!(normalize_playcount(Some(&json!("invalid"))), None);
/// assert_eq!(normalize_playcount(None), None);
/// ```
pub fn normalize_playcount(value: Option<&Value>) -> Option<u64> {
    normalize_count(value)
}

/// Normalise a duration-in-seconds field. Same contract as [`normalize_playcount`].
pub fn normalize_duration(value: Option<&Value>) -> Option<u64> {
    normalize_count(value)
}

fn normalize_count(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Some(v);
            }
            let f = n.as_f64()?;
            // u64::MAX as f64 rounds up to 2^64, which is already out of range.
            if f.is_finite() && f >= 0.0 && f < u64::MAX as f64 {
                Some(f.trunc() as u64)
            } else {
                None
            }
        }
        Value::String(s) => {
            let parsed = parse_leading_integer(s)?;
            u64::try_from(parsed).ok()
        }
        _ => None,
    }
}

/// Parse a base-10 integer prefix the way lenient web APIs expect.
///
/// Leading whitespace is skipped, an optional sign is honoured and parsing stops at
/// the first non-digit. Returns `None` when no digits are found or the value does
/// not fit in an `i128`.
pub fn parse_leading_integer(input: &str) -> Option<i128> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i128 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
