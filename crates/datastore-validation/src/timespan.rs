//! Minimum window length for day-or-coarser queries
use crate::datetime::DateTimeValidator;
use crate::duration::{END_AT, START_AT};
use crate::error::ValidationError;
use crate::params::QueryParameters;
use crate::period::{Period, PeriodValidator};
use crate::validator::{Parsed, Validator};

const HOURS_PER_DAY: f64 = 24.0;

#[derive(Debug, Clone, Copy)]
pub struct TimespanValidator {
    min_days: u32,
}

impl TimespanValidator {
    pub fn new(min_days: u32) -> Self {
        Self { min_days }
    }

    pub fn min_days(&self) -> u32 {
        self.min_days
    }

    /// Span in days between `start_at` and `end_at` when the rule applies
    pub fn parse(&self, params: &QueryParameters) -> Result<Option<f64>, ValidationError> {
        let start_at = DateTimeValidator::new(START_AT).lookup(params);
        let end_at = DateTimeValidator::new(END_AT).lookup(params);
        let period = PeriodValidator::lookup(params);

        let (Some(start_at), Some(end_at), Some(period)) = (start_at, end_at, period) else {
            return Ok(None);
        };
        if period == Period::Hour {
            return Ok(None);
        }

        let hours = (end_at - start_at).num_seconds().abs() as f64 / 3600.0;
        if hours < f64::from(self.min_days) * HOURS_PER_DAY {
            return Err(ValidationError::new(
                format!("The minimum timespan for a query is {} days", self.min_days),
                &[START_AT, END_AT],
            ));
        }

        Ok(Some(hours / HOURS_PER_DAY))
    }
}

impl Validator for TimespanValidator {
    fn id(&self) -> String {
        format!("timespan.{}d", self.min_days)
    }

    fn validate(&self, params: &QueryParameters) -> Result<Parsed, ValidationError> {
        self.parse(params).map(|d| d.map_or(Parsed::Absent, Parsed::Days))
    }
}
