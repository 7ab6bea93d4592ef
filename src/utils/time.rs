use chrono::{DateTime, Duration, Utc};

pub const UPCOMING_WINDOW_HOURS: i64 = 24;
/// How long before the start the join action opens.
pub const JOIN_EARLY_MINUTES: i64 = 60;
/// How long after the start the join action stays open.
pub const JOIN_LATE_MINUTES: i64 = 15;

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn from_rfc3339(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

/// `0 < scheduled - now <= 24h`
pub fn is_upcoming(scheduled: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let until = scheduled - now;
    until > Duration::zero() && until <= Duration::hours(UPCOMING_WINDOW_HOURS)
}

/// `-15min <= scheduled - now <= 60min`
pub fn can_join(scheduled: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let until = scheduled - now;
    until >= -Duration::minutes(JOIN_LATE_MINUTES) && until <= Duration::minutes(JOIN_EARLY_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(offset_ms: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = from_rfc3339("2026-05-04T12:00:00Z").unwrap();
        (now + Duration::milliseconds(offset_ms), now)
    }

    #[test]
    fn upcoming_window_boundaries() {
        let cases = [
            (-1, false),
            (0, false),
            (1, true),
            (3_600_000, true),
            (86_400_000, true),
            (86_400_001, false),
        ];
        for (offset, expected) in cases {
            let (scheduled, now) = at(offset);
            assert_eq!(is_upcoming(scheduled, now), expected, "offset {}", offset);
        }
    }

    #[test]
    fn join_window_boundaries() {
        let cases = [
            (-900_001, false),
            (-900_000, true),
            (0, true),
            (3_600_000, true),
            (3_600_001, false),
        ];
        for (offset, expected) in cases {
            let (scheduled, now) = at(offset);
            assert_eq!(can_join(scheduled, now), expected, "offset {}", offset);
        }
    }

    #[test]
    fn predicates_are_independent() {
        // Two hours out: upcoming but not yet joinable.
        let (scheduled, now) = at(2 * 3_600_000);
        assert!(is_upcoming(scheduled, now));
        assert!(!can_join(scheduled, now));

        // Started ten minutes ago: joinable but no longer upcoming.
        let (scheduled, now) = at(-600_000);
        assert!(!is_upcoming(scheduled, now));
        assert!(can_join(scheduled, now));
    }

    #[test]
    fn rfc3339_offsets_normalize_to_utc() {
        let parsed = from_rfc3339("2026-05-04T14:30:00+02:00").unwrap();
        assert_eq!(parsed, from_rfc3339("2026-05-04T12:30:00.000Z").unwrap());
        assert!(from_rfc3339("04/05/2026").is_err());
    }
}
