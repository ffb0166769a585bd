//! Freshness windows for cursors and linking codes.
//!
//! Every check is a pure function of the recorded instant, the current instant
//! and the window, so callers pass `now` in and tests never sleep.

use chrono::{DateTime, Duration, Utc};

/// How long a cursor and a linking code stay usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ttls {
    pub cursor: Duration,
    pub sync: Duration,
}

impl Default for Ttls {
    fn default() -> Self {
        Self {
            cursor: Duration::minutes(5),
            sync: Duration::minutes(3),
        }
    }
}

/// A cursor is stale once strictly more than `ttl` has passed since it was set.
pub fn is_cursor_stale(set_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now - set_at > ttl
}

/// The instant a linking code stops being accepted, or `None` when it lies past
/// the representable range.
pub fn linking_deadline(initialized_at: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
    initialized_at.checked_add_signed(ttl)
}

/// A linking code expires at `initialized_at + ttl`, inclusive. A deadline past
/// the representable range never arrives.
pub fn is_linking_expired(initialized_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    linking_deadline(initialized_at, ttl).is_some_and(|deadline| now >= deadline)
}

/// Converts epoch milliseconds as written by the account dashboard.
///
/// Values outside chrono's range are clamped to the epoch, which reads as expired.
pub fn from_epoch_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn cursor_is_fresh_up_to_and_including_ttl() {
        let ttl = Duration::minutes(5);
        assert!(!is_cursor_stale(at(0), at(299), ttl));
        assert!(!is_cursor_stale(at(0), at(300), ttl));
        assert!(is_cursor_stale(at(0), at(301), ttl));
    }

    #[test]
    fn linking_code_expires_at_deadline() {
        let ttl = Duration::minutes(3);
        assert!(!is_linking_expired(at(0), at(179), ttl));
        assert!(is_linking_expired(at(0), at(180), ttl));
    }

    #[test]
    fn deadline_past_the_range_is_not_expired() {
        let far = DateTime::<Utc>::MAX_UTC - Duration::seconds(1);
        assert_eq!(linking_deadline(far, Duration::minutes(3)), None);
        assert!(!is_linking_expired(far, at(0), Duration::minutes(3)));
        assert!(!is_linking_expired(at(0), at(180), Duration::MAX));
    }

    #[test]
    fn epoch_millis_round_to_the_same_instant() {
        let instant = at(42);
        assert_eq!(from_epoch_millis(instant.timestamp_millis()), instant);
        assert_eq!(from_epoch_millis(i64::MAX), DateTime::<Utc>::UNIX_EPOCH);
    }
}
