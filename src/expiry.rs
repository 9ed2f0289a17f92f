//! Name expiry rules.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// How long after its nominal expiry a name is still treated as held.
pub const GRACE_PERIOD_MS: i64 = 31 * 24 * 60 * 60 * 1000;

pub fn grace_period() -> Duration {
    Duration::milliseconds(GRACE_PERIOD_MS)
}

/// Read an expiry timestamp out of a Pact time value.
///
/// Accepts `{"timep": ..}` and `{"time": ..}`, where the inner value is
/// either epoch milliseconds or an RFC 3339 string. Anything else is `None`.
pub fn transform_pact_date(value: &Value) -> Option<DateTime<Utc>> {
    let object = value.as_object()?;
    ["timep", "time"]
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(parse_time_value)
}

fn parse_time_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let ms = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(ms)
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

/// A name is expired once `now` is strictly past `expiry` plus the grace period.
///
/// An expiry so late that the grace period runs past the end of representable
/// time never expires.
pub fn is_name_expired_at(expiry: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expiry
        .checked_add_signed(grace_period())
        .map_or(false, |end| now > end)
}

pub fn is_name_expired(expiry: DateTime<Utc>) -> bool {
    is_name_expired_at(expiry, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grace_period_boundaries() {
        let now = Utc::now();
        assert!(is_name_expired_at(now - Duration::days(32), now));
        assert!(!is_name_expired_at(now - Duration::days(30), now));
        // exactly at the end of the grace period is still held
        let expiry = now - Duration::milliseconds(GRACE_PERIOD_MS);
        assert!(!is_name_expired_at(expiry, now));
        assert!(is_name_expired_at(expiry, now + Duration::milliseconds(1)));
    }

    #[test]
    fn reads_both_time_shapes() {
        let ms = 1_672_531_200_000i64;
        let expected = DateTime::from_timestamp_millis(ms).unwrap();
        assert_eq!(transform_pact_date(&json!({ "timep": ms })), Some(expected));
        assert_eq!(transform_pact_date(&json!({ "time": ms })), Some(expected));
        assert_eq!(
            transform_pact_date(&json!({ "time": "2023-01-01T00:00:00Z" })),
            Some(expected)
        );
    }

    #[test]
    fn unknown_shapes_have_no_expiry() {
        assert_eq!(transform_pact_date(&json!({ "invalid": "data" })), None);
        assert_eq!(transform_pact_date(&json!(null)), None);
        assert_eq!(transform_pact_date(&json!(1_672_531_200_000i64)), None);
        assert_eq!(transform_pact_date(&json!({ "timep": "not a date" })), None);
    }

    #[test]
    fn latest_expiry_is_never_expired() {
        assert!(!is_name_expired_at(DateTime::<Utc>::MAX_UTC, DateTime::<Utc>::MAX_UTC));
        assert!(!is_name_expired(DateTime::<Utc>::MAX_UTC));
    }
}
