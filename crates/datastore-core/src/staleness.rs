//! Staleness evaluation for a single data-set
use chrono::{DateTime, Utc};

use crate::data_model::StalenessVerdict;

/// Decide whether a data-set last written at `last_updated` is out of date
/// at `now` under a `max_expected_age` policy (seconds).
///
/// A zero policy or a data-set that has never been written is never stale.
pub fn evaluate_staleness(
    max_expected_age: u64,
    last_updated: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> StalenessVerdict {
    let Some(last) = last_updated.filter(|_| max_expected_age != 0) else {
        return StalenessVerdict::not_applicable(max_expected_age, last_updated);
    };

    let age = (now - last).num_seconds();
    let max_age = i64::try_from(max_expected_age).unwrap_or(i64::MAX);
    let is_stale = age > max_age;

    StalenessVerdict {
        is_stale,
        seconds_out_of_date: if is_stale { (age - max_age).max(0) } else { 0 },
        last_updated,
        max_expected_age,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_zero_policy_is_never_stale() {
        let now = Utc::now();
        let verdict = evaluate_staleness(0, Some(now - Duration::days(365)), now);
        assert!(!verdict.is_stale);
    }

    #[test]
    fn test_never_written_is_never_stale() {
        let verdict = evaluate_staleness(60, None, Utc::now());
        assert!(!verdict.is_stale);
        assert_eq!(verdict.last_updated, None);
    }

    #[test]
    fn test_stale_reports_seconds_past_policy() {
        let now = Utc::now();
        let verdict = evaluate_staleness(3600, Some(now - Duration::seconds(7200)), now);

        assert!(verdict.is_stale);
        assert_eq!(verdict.seconds_out_of_date, 3600);
        assert_eq!(verdict.max_expected_age, 3600);
    }

    #[test]
    fn test_exactly_at_limit_is_fresh() {
        let now = Utc::now();
        let verdict = evaluate_staleness(3600, Some(now - Duration::seconds(3600)), now);
        assert!(!verdict.is_stale);
        assert_eq!(verdict.seconds_out_of_date, 0);
    }

    #[test]
    fn test_future_write_is_fresh() {
        let now = Utc::now();
        let verdict = evaluate_staleness(10, Some(now + Duration::minutes(5)), now);
        assert!(!verdict.is_stale);
    }
}
