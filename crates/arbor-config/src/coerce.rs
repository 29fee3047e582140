//! Scalar type coercion.
//!
//! Every kind has two functions:
//!
//! - `as_*` converts leniently across compatible representations, falling
//!   back to parsing the value's textual form.
//! - `strict_as_*` only answers when the value already has a matching type.
//!
//! Neither mode fails. An absent or unconvertible value is `None`, since
//! missing configuration is an expected condition rather than an error.

use crate::value::ScalarValue;
use chrono::{DateTime, FixedOffset, Utc};

pub fn as_string(value: &ScalarValue) -> Option<String> {
    Some(value.to_string())
}

pub fn strict_as_string(value: &ScalarValue) -> Option<String> {
    value.as_str().map(str::to_string)
}

pub fn as_float(value: &ScalarValue) -> Option<f32> {
    match value {
        ScalarValue::Float(f) => Some(*f),
        ScalarValue::Int(i) => Some(*i as f32),
        other => other.to_string().trim().parse().ok(),
    }
}

pub fn strict_as_float(value: &ScalarValue) -> Option<f32> {
    match value {
        ScalarValue::Float(f) => Some(*f),
        ScalarValue::Int(i) => Some(*i as f32),
        _ => None,
    }
}

pub fn as_double(value: &ScalarValue) -> Option<f64> {
    strict_as_double(value).or_else(|| value.to_string().trim().parse().ok())
}

pub fn strict_as_double(value: &ScalarValue) -> Option<f64> {
    match value {
        ScalarValue::Double(d) => Some(*d),
        ScalarValue::Float(f) => Some(f64::from(*f)),
        ScalarValue::Int(i) => Some(f64::from(*i)),
        ScalarValue::Long(l) => Some(*l as f64),
        _ => None,
    }
}

/// Lenient integer conversion.
///
/// Floating point values convert only when they have no fractional part
/// and fit in 32 bits.
pub fn as_int(value: &ScalarValue) -> Option<i32> {
    match value {
        ScalarValue::Int(i) => return Some(*i),
        ScalarValue::Float(f) => {
            if let Some(i) = integral(f64::from(*f), i32::MIN as f64, i32::MAX as f64) {
                return Some(i as i32);
            }
        }
        ScalarValue::Double(d) => {
            if let Some(i) = integral(*d, i32::MIN as f64, i32::MAX as f64) {
                return Some(i as i32);
            }
        }
        _ => {}
    }
    value.to_string().parse().ok()
}

pub fn strict_as_int(value: &ScalarValue) -> Option<i32> {
    match value {
        ScalarValue::Int(i) => Some(*i),
        _ => None,
    }
}

pub fn as_long(value: &ScalarValue) -> Option<i64> {
    match value {
        ScalarValue::Long(l) => return Some(*l),
        ScalarValue::Int(i) => return Some(i64::from(*i)),
        ScalarValue::Float(f) => {
            if let Some(l) = integral(f64::from(*f), i64::MIN as f64, i64::MAX as f64) {
                return Some(l);
            }
        }
        ScalarValue::Double(d) => {
            if let Some(l) = integral(*d, i64::MIN as f64, i64::MAX as f64) {
                return Some(l);
            }
        }
        _ => {}
    }
    value.to_string().parse().ok()
}

pub fn strict_as_long(value: &ScalarValue) -> Option<i64> {
    match value {
        ScalarValue::Long(l) => Some(*l),
        ScalarValue::Int(i) => Some(i64::from(*i)),
        _ => None,
    }
}

/// Lenient boolean conversion.
///
/// Numbers are true unless zero. Text matches the case-sensitive tokens
/// `true t yes y 1` and `false f no n 0`.
pub fn as_bool(value: &ScalarValue) -> Option<bool> {
    match value {
        ScalarValue::Boolean(b) => Some(*b),
        ScalarValue::Int(i) => Some(*i != 0),
        ScalarValue::Long(l) => Some(*l != 0),
        ScalarValue::Float(f) => Some(*f != 0.0),
        ScalarValue::Double(d) => Some(*d != 0.0),
        ScalarValue::String(s) => bool_token(s),
        other => bool_token(&other.to_string()),
    }
}

pub fn strict_as_bool(value: &ScalarValue) -> Option<bool> {
    match value {
        ScalarValue::Boolean(b) => Some(*b),
        _ => None,
    }
}

/// Lenient instant conversion.
///
/// Dates convert through epoch milliseconds; text must be an RFC 3339
/// timestamp.
pub fn as_instant(value: &ScalarValue) -> Option<DateTime<Utc>> {
    match value {
        ScalarValue::Instant(instant) => Some(*instant),
        ScalarValue::Date(date) => DateTime::from_timestamp_millis(date.timestamp_millis()),
        ScalarValue::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        _ => None,
    }
}

pub fn strict_as_instant(value: &ScalarValue) -> Option<DateTime<Utc>> {
    match value {
        ScalarValue::Instant(instant) => Some(*instant),
        _ => None,
    }
}

/// Lenient date conversion.
///
/// Instants convert through epoch milliseconds (at UTC); integers are read
/// as epoch milliseconds; text must be an RFC 3339 timestamp.
pub fn as_date(value: &ScalarValue) -> Option<DateTime<FixedOffset>> {
    match value {
        ScalarValue::Date(date) => Some(*date),
        ScalarValue::Instant(instant) => {
            DateTime::from_timestamp_millis(instant.timestamp_millis()).map(|t| t.fixed_offset())
        }
        ScalarValue::Int(millis) => {
            DateTime::from_timestamp_millis(i64::from(*millis)).map(|t| t.fixed_offset())
        }
        ScalarValue::Long(millis) => {
            DateTime::from_timestamp_millis(*millis).map(|t| t.fixed_offset())
        }
        ScalarValue::String(s) => DateTime::parse_from_rfc3339(s.trim()).ok(),
        _ => None,
    }
}

pub fn strict_as_date(value: &ScalarValue) -> Option<DateTime<FixedOffset>> {
    match value {
        ScalarValue::Date(date) => Some(*date),
        _ => None,
    }
}

fn bool_token(text: &str) -> Option<bool> {
    match text {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// The integral value of `value` if it has no fractional part and lies in
/// `[min, max]`.
fn integral(value: f64, min: f64, max: f64) -> Option<i64> {
    if value.is_finite() && value == value.floor() && value >= min && value <= max {
        Some(value as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // ==================== Integers ====================

    #[test]
    fn test_as_int_accepts_integral_doubles() {
        assert_eq!(as_int(&ScalarValue::Double(2.0)), Some(2));
        assert_eq!(as_int(&ScalarValue::Float(-7.0)), Some(-7));
    }

    #[test]
    fn test_as_int_rejects_fractions() {
        assert_eq!(as_int(&ScalarValue::Double(2.5)), None);
        assert_eq!(as_int(&ScalarValue::Double(1e12)), None);
    }

    #[test]
    fn test_as_int_parses_text() {
        assert_eq!(as_int(&ScalarValue::from("42")), Some(42));
        assert_eq!(as_int(&ScalarValue::from("4.2")), None);
        assert_eq!(as_int(&ScalarValue::Long(5)), Some(5));
        assert_eq!(as_int(&ScalarValue::Long(i64::MAX)), None);
        assert_eq!(as_int(&ScalarValue::from(true)), None);
    }

    #[test]
    fn test_strict_as_int() {
        assert_eq!(strict_as_int(&ScalarValue::Int(2)), Some(2));
        assert_eq!(strict_as_int(&ScalarValue::Double(2.0)), None);
        assert_eq!(strict_as_int(&ScalarValue::from("2")), None);
    }

    #[test]
    fn test_as_long() {
        assert_eq!(as_long(&ScalarValue::Int(3)), Some(3));
        assert_eq!(as_long(&ScalarValue::Double(1e12)), Some(1_000_000_000_000));
        assert_eq!(as_long(&ScalarValue::from("-9")), Some(-9));
        assert_eq!(strict_as_long(&ScalarValue::Int(3)), Some(3));
        assert_eq!(strict_as_long(&ScalarValue::Double(3.0)), None);
    }

    // ==================== Floating point ====================

    #[test]
    fn test_as_double() {
        assert_eq!(as_double(&ScalarValue::Int(3)), Some(3.0));
        assert_eq!(as_double(&ScalarValue::from(" 1.25 ")), Some(1.25));
        assert_eq!(as_double(&ScalarValue::from("abc")), None);
        assert_eq!(strict_as_double(&ScalarValue::Long(4)), Some(4.0));
        assert_eq!(strict_as_double(&ScalarValue::from("4")), None);
    }

    #[test]
    fn test_as_float() {
        assert_eq!(as_float(&ScalarValue::Float(0.5)), Some(0.5));
        assert_eq!(as_float(&ScalarValue::Double(0.5)), Some(0.5));
        assert_eq!(strict_as_float(&ScalarValue::Int(2)), Some(2.0));
        assert_eq!(strict_as_float(&ScalarValue::Double(0.5)), None);
    }

    // ==================== Booleans ====================

    #[test]
    fn test_as_bool_tokens() {
        for token in ["true", "t", "yes", "y", "1"] {
            assert_eq!(as_bool(&ScalarValue::from(token)), Some(true), "{token}");
        }
        for token in ["false", "f", "no", "n", "0"] {
            assert_eq!(as_bool(&ScalarValue::from(token)), Some(false), "{token}");
        }
    }

    #[test]
    fn test_as_bool_is_case_sensitive() {
        assert_eq!(as_bool(&ScalarValue::from("Yes")), None);
        assert_eq!(as_bool(&ScalarValue::from("TRUE")), None);
        assert_eq!(as_bool(&ScalarValue::from("maybe")), None);
    }

    #[test]
    fn test_as_bool_numbers() {
        assert_eq!(as_bool(&ScalarValue::Int(0)), Some(false));
        assert_eq!(as_bool(&ScalarValue::Long(0)), Some(false));
        assert_eq!(as_bool(&ScalarValue::Double(0.0)), Some(false));
        assert_eq!(as_bool(&ScalarValue::Int(-3)), Some(true));
        assert_eq!(as_bool(&ScalarValue::Double(0.1)), Some(true));
        assert_eq!(strict_as_bool(&ScalarValue::Int(1)), None);
    }

    // ==================== Strings ====================

    #[test]
    fn test_strings() {
        assert_eq!(as_string(&ScalarValue::Int(7)), Some("7".to_string()));
        assert_eq!(strict_as_string(&ScalarValue::Int(7)), None);
        assert_eq!(
            strict_as_string(&ScalarValue::from("seven")),
            Some("seven".to_string())
        );
    }

    // ==================== Temporal ====================

    #[test]
    fn test_as_instant() {
        let instant = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(as_instant(&ScalarValue::Instant(instant)), Some(instant));
        assert_eq!(
            as_instant(&ScalarValue::from("2021-06-01T14:00:00+02:00")),
            Some(instant)
        );
        assert_eq!(
            as_instant(&ScalarValue::Date(instant.fixed_offset())),
            Some(instant)
        );
        assert_eq!(as_instant(&ScalarValue::from("yesterday")), None);
        assert_eq!(as_instant(&ScalarValue::Long(0)), None);
        assert_eq!(strict_as_instant(&ScalarValue::Date(instant.fixed_offset())), None);
    }

    #[test]
    fn test_as_date() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap().fixed_offset();
        assert_eq!(as_date(&ScalarValue::Long(0)), Some(epoch));

        let instant = Utc.timestamp_millis_opt(1_500).unwrap();
        assert_eq!(
            as_date(&ScalarValue::Instant(instant)).map(|d| d.timestamp_millis()),
            Some(1_500)
        );
        assert_eq!(as_date(&ScalarValue::Boolean(true)), None);
        assert_eq!(strict_as_date(&ScalarValue::Instant(instant)), None);
    }
}
