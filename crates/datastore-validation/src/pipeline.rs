//! Validation Pipeline: runs validators in order and collects every failure
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::alignment::{MidnightValidator, MondayValidator, MonthValidator};
use crate::datetime::DateTimeValidator;
use crate::duration::{DurationValidator, END_AT, START_AT};
use crate::error::ValidationError;
use crate::params::QueryParameters;
use crate::period::{Period, PeriodValidator};
use crate::timespan::TimespanValidator;
use crate::validator::{Parsed, Validator};

/// A query window whose fields have all been validated.
///
/// `duration` never appears alongside both `start_at` and `end_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl ParsedWindow {
    /// Build a window from individually parsed fields.
    ///
    /// The duration parse runs the co-requirement checks, so a pipeline that
    /// omits [`DurationValidator`] still cannot produce an inconsistent window.
    pub fn from_parameters(params: &QueryParameters) -> Result<Self, ValidationError> {
        let duration = DurationValidator::new().parse(params)?;
        let start_at = DateTimeValidator::new(START_AT).parse(params)?;
        let end_at = DateTimeValidator::new(END_AT).parse(params)?;
        let period = PeriodValidator::new().parse(params)?;

        Ok(Self {
            start_at,
            end_at,
            duration,
            period,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Every validator's outcome for one parameter map, in evaluation order
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    outcomes: Vec<(String, Parsed)>,
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// First violated rule in evaluation order
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Value produced by the validator with `id`, if it succeeded
    pub fn parsed(&self, id: &str) -> Option<&Parsed> {
        self.outcomes
            .iter()
            .find(|(outcome_id, _)| outcome_id == id)
            .map(|(_, parsed)| parsed)
    }
}

pub struct ValidationPipeline {
    validators: Vec<Box<dyn Validator>>,
    pipeline_id: String,
}

impl ValidationPipeline {
    pub fn new(validators: Vec<Box<dyn Validator>>) -> Self {
        let pipeline_id = validators
            .iter()
            .map(|v| v.id())
            .collect::<Vec<_>>()
            .join("→");

        Self {
            validators,
            pipeline_id,
        }
    }

    /// Standard checks for a time-window query: dependencies, datetimes,
    /// period, alignment, then minimum span.
    pub fn for_query(min_timespan_days: u32) -> Self {
        let mut validators: Vec<Box<dyn Validator>> = vec![
            Box::new(DurationValidator::new()),
            Box::new(DateTimeValidator::new(START_AT)),
            Box::new(DateTimeValidator::new(END_AT)),
            Box::new(PeriodValidator::new()),
        ];
        for field in [START_AT, END_AT] {
            validators.push(Box::new(MidnightValidator::new(field)));
        }
        for field in [START_AT, END_AT] {
            validators.push(Box::new(MondayValidator::new(field)));
        }
        for field in [START_AT, END_AT] {
            validators.push(Box::new(MonthValidator::new(field)));
        }
        validators.push(Box::new(TimespanValidator::new(min_timespan_days)));

        Self::new(validators)
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    /// Run every validator, even after one has failed
    pub fn run(&self, params: &QueryParameters) -> ValidationReport {
        let mut report = ValidationReport::default();

        for validator in &self.validators {
            match validator.validate(params) {
                Ok(parsed) => report.outcomes.push((validator.id(), parsed)),
                Err(err) => {
                    tracing::debug!(validator = %validator.id(), error = %err, "validation failed");
                    report.errors.push(err);
                }
            }
        }

        report
    }

    /// Validate and build the window, reporting the first violated rule
    pub fn validate(&self, params: &QueryParameters) -> Result<ParsedWindow, ValidationError> {
        let report = self.run(params);
        if let Some(err) = report.first_error() {
            return Err(err.clone());
        }
        ParsedWindow::from_parameters(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_id_lists_validators_in_order() {
        let pipeline = ValidationPipeline::for_query(7);
        let id = pipeline.pipeline_id();

        assert!(id.starts_with("duration→datetime.start_at→datetime.end_at→period→midnight.start_at"));
        assert!(id.ends_with("timespan.7d"));
    }

    #[test]
    fn test_run_collects_every_failure() {
        let params = QueryParameters::new()
            .with("start_at", "2024-03-05T12:00:00Z")
            .with("duration", "2")
            .with("period", "week");

        let report = ValidationPipeline::for_query(7).run(&params);

        let messages: Vec<&str> = report.errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "start_at must be midnight");
        assert!(messages[1].starts_with("start_at must be a Monday"));
    }

    #[test]
    fn test_report_exposes_parsed_values() {
        let params = QueryParameters::new().with("duration", "4").with("period", "month");
        let report = ValidationPipeline::for_query(7).run(&params);

        assert!(report.is_valid());
        assert_eq!(report.parsed("duration"), Some(&Parsed::Int(4)));
        assert_eq!(report.parsed("period"), Some(&Parsed::Period(Period::Month)));
        assert_eq!(report.parsed("datetime.start_at"), Some(&Parsed::Absent));
    }

    #[test]
    fn test_custom_pipeline_still_guards_window_invariant() {
        let pipeline = ValidationPipeline::new(vec![Box::new(PeriodValidator::new())]);
        let params = QueryParameters::new()
            .with("duration", "1")
            .with("start_at", "2024-01-01T00:00:00Z")
            .with("end_at", "2024-02-01T00:00:00Z")
            .with("period", "day");

        assert!(pipeline.validate(&params).is_err());
    }

    #[test]
    fn test_empty_query_yields_empty_window() {
        let window = ValidationPipeline::for_query(7)
            .validate(&QueryParameters::new())
            .unwrap();
        assert!(window.is_empty());
    }
}
