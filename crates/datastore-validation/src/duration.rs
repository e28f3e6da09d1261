//! Absolute vs. relative time selection.
//!
//! A window is either `start_at` + `end_at`, or `duration` (in periods)
//! anchored on one of them or on now. The checks run in a fixed order and
//! the first violated one is returned.

use crate::error::ValidationError;
use crate::params::QueryParameters;
use crate::validator::{Parsed, Validator};

pub const DURATION: &str = "duration";
pub const START_AT: &str = "start_at";
pub const END_AT: &str = "end_at";

#[derive(Debug, Clone, Copy, Default)]
pub struct DurationValidator;

impl DurationValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, params: &QueryParameters) -> Result<Option<u32>, ValidationError> {
        let duration = params.values(DURATION);
        let has_duration = duration.is_some();
        let has_period = params.contains("period");
        let has_start = params.contains(START_AT);
        let has_end = params.contains(END_AT);

        if has_duration && has_start && has_end {
            return Err(ValidationError::new(
                "Absolute and relative time cannot be requested at the same time - either ask \
                 for 'start_at' and 'end_at', or ask for 'start_at'/'end_at' with 'duration'",
                &[DURATION, START_AT, END_AT],
            ));
        }

        if has_start && !(has_duration || has_end) {
            return Err(ValidationError::new(
                "Use of 'start_at' requires 'end_at' or 'duration'",
                &[START_AT],
            ));
        }

        if has_end && !(has_duration || has_start) {
            return Err(ValidationError::new(
                "Use of 'end_at' requires 'start_at' or 'duration'",
                &[END_AT],
            ));
        }

        let Some(values) = duration else {
            return Ok(None);
        };

        if !has_period {
            return Err(ValidationError::new(
                "If 'duration' is requested (for relative time), 'period' is required - please \
                 add a period (like 'day', 'month' etc)",
                &[DURATION, "period"],
            ));
        }

        let value = match values {
            [value] => value,
            _ => {
                return Err(ValidationError::new(
                    format!("duration should be a single argument but received {}", values.len()),
                    &[DURATION],
                ))
            }
        };

        if value == "0" {
            return Err(ValidationError::new("duration must be positive", &[DURATION]));
        }

        match value.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(ValidationError::new(
                "duration must be a positive integer",
                &[DURATION],
            )),
        }
    }
}

impl Validator for DurationValidator {
    fn id(&self) -> String {
        "duration".to_string()
    }

    fn validate(&self, params: &QueryParameters) -> Result<Parsed, ValidationError> {
        self.parse(params).map(|d| d.map_or(Parsed::Absent, Parsed::Int))
    }
}
