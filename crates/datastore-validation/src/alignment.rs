//! Bucket alignment rules for window boundaries.
//!
//! Each rule only fires when its field parses as a datetime and `period`
//! is valid; malformed input is left to [`DateTimeValidator`] and
//! [`PeriodValidator`] to report.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

use crate::datetime::DateTimeValidator;
use crate::error::ValidationError;
use crate::params::QueryParameters;
use crate::period::{Period, PeriodValidator};
use crate::validator::{Parsed, Validator};

/// Boundary datetime and the requested period, when both are usable
fn boundary(name: &str, params: &QueryParameters) -> Option<(DateTime<Utc>, Period)> {
    let date = DateTimeValidator::new(name).lookup(params)?;
    let period = PeriodValidator::lookup(params)?;
    Some((date, period))
}

fn is_midnight(t: &DateTime<Utc>) -> bool {
    t.hour() == 0 && t.minute() == 0 && t.second() == 0
}

/// Boundaries of any period coarser than an hour must fall on 00:00:00 UTC
#[derive(Debug, Clone)]
pub struct MidnightValidator {
    name: String,
}

impl MidnightValidator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Validator for MidnightValidator {
    fn id(&self) -> String {
        format!("midnight.{}", self.name)
    }

    fn validate(&self, params: &QueryParameters) -> Result<Parsed, ValidationError> {
        match boundary(&self.name, params) {
            Some((date, period)) if period != Period::Hour => {
                if !is_midnight(&date) {
                    return Err(ValidationError::new(
                        format!("{} must be midnight", self.name),
                        &[self.name.as_str(), "period"],
                    ));
                }
                Ok(Parsed::DateTime(date))
            }
            _ => Ok(Parsed::Absent),
        }
    }
}

/// Weekly boundaries must fall on a Monday (UTC)
#[derive(Debug, Clone)]
pub struct MondayValidator {
    name: String,
}

impl MondayValidator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Validator for MondayValidator {
    fn id(&self) -> String {
        format!("monday.{}", self.name)
    }

    fn validate(&self, params: &QueryParameters) -> Result<Parsed, ValidationError> {
        match boundary(&self.name, params) {
            Some((date, Period::Week)) => {
                if date.weekday() != Weekday::Mon {
                    return Err(ValidationError::new(
                        format!("{} must be a Monday but was {}", self.name, date.to_rfc3339()),
                        &[self.name.as_str(), "period"],
                    ));
                }
                Ok(Parsed::DateTime(date))
            }
            _ => Ok(Parsed::Absent),
        }
    }
}

/// Monthly boundaries must fall on the first day of a month (UTC)
#[derive(Debug, Clone)]
pub struct MonthValidator {
    name: String,
}

impl MonthValidator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Validator for MonthValidator {
    fn id(&self) -> String {
        format!("month.{}", self.name)
    }

    fn validate(&self, params: &QueryParameters) -> Result<Parsed, ValidationError> {
        match boundary(&self.name, params) {
            Some((date, Period::Month)) => {
                if date.day() != 1 {
                    return Err(ValidationError::new(
                        format!(
                            "{} must be the first of the month but was {}",
                            self.name,
                            date.to_rfc3339()
                        ),
                        &[self.name.as_str(), "period"],
                    ));
                }
                Ok(Parsed::DateTime(date))
            }
            _ => Ok(Parsed::Absent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(start_at: &str, period: &str) -> QueryParameters {
        QueryParameters::new()
            .with("start_at", start_at)
            .with("period", period)
    }

    #[test]
    fn test_midnight_required_for_day() {
        let validator = MidnightValidator::new("start_at");

        assert!(validator.validate(&params("2024-03-04T00:00:00Z", "day")).is_ok());

        let err = validator
            .validate(&params("2024-03-04T00:00:01Z", "day"))
            .unwrap_err();
        assert_eq!(err.message, "start_at must be midnight");
    }

    #[test]
    fn test_midnight_uses_utc_wall_clock() {
        let validator = MidnightValidator::new("start_at");
        // 01:00 at +01:00 is midnight UTC
        assert!(validator.validate(&params("2024-03-04T01:00:00+01:00", "week")).is_ok());
        assert!(validator.validate(&params("2024-03-04T00:00:00+01:00", "week")).is_err());
    }

    #[test]
    fn test_midnight_skipped_for_hour_or_missing_period() {
        let validator = MidnightValidator::new("start_at");
        let no_period = QueryParameters::new().with("start_at", "2024-03-04T13:45:00Z");

        assert_eq!(
            validator.validate(&params("2024-03-04T13:45:00Z", "hour")).unwrap(),
            Parsed::Absent
        );
        assert_eq!(validator.validate(&no_period).unwrap(), Parsed::Absent);
    }

    #[test]
    fn test_midnight_tolerates_unparseable_date() {
        let validator = MidnightValidator::new("start_at");
        assert_eq!(validator.validate(&params("soon", "day")).unwrap(), Parsed::Absent);
    }

    #[test]
    fn test_monday_alignment() {
        let validator = MondayValidator::new("start_at");

        // 2024-03-04 is a Monday
        assert!(validator.validate(&params("2024-03-04T00:00:00Z", "week")).is_ok());

        let err = validator
            .validate(&params("2024-03-05T00:00:00Z", "week"))
            .unwrap_err();
        assert!(err.message.starts_with("start_at must be a Monday"));
    }

    #[test]
    fn test_monday_only_for_week() {
        let validator = MondayValidator::new("start_at");
        assert_eq!(
            validator.validate(&params("2024-03-05T00:00:00Z", "day")).unwrap(),
            Parsed::Absent
        );
    }

    #[test]
    fn test_month_alignment() {
        let validator = MonthValidator::new("start_at");

        assert!(validator.validate(&params("2024-03-01T00:00:00Z", "month")).is_ok());

        let err = validator
            .validate(&params("2024-03-02T00:00:00Z", "month"))
            .unwrap_err();
        assert!(err.message.contains("must be the first of the month"));
        assert!(err.concerns("start_at"));
    }

    #[test]
    fn test_month_only_for_month() {
        let validator = MonthValidator::new("end_at");
        let params = QueryParameters::new()
            .with("end_at", "2024-03-02T00:00:00Z")
            .with("period", "week");
        assert_eq!(validator.validate(&params).unwrap(), Parsed::Absent);
    }
}
