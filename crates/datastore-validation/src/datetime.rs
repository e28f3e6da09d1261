//! Datetime parsing for `start_at` / `end_at`
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::ValidationError;
use crate::params::QueryParameters;
use crate::validator::{Parsed, Validator};

/// Naive layout; read as UTC
const NAIVE_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";

/// Naive layout followed by a space and a `±HH:MM` offset
const SPACED_OFFSET_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S %:z";

/// Parse any accepted datetime layout into a UTC instant.
///
/// Tries RFC 3339 first, then the naive layout, then the naive layout with
/// a space-separated offset.
pub fn parse_datetime(candidate: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(candidate) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(candidate, NAIVE_LAYOUT) {
        return Some(Utc.from_utc_datetime(&naive));
    }
    DateTime::parse_from_str(candidate, SPACED_OFFSET_LAYOUT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Clone)]
pub struct DateTimeValidator {
    name: String,
}

impl DateTimeValidator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parse(&self, params: &QueryParameters) -> Result<Option<DateTime<Utc>>, ValidationError> {
        let Some(values) = params.values(&self.name) else {
            return Ok(None);
        };

        match values {
            [value] => parse_datetime(value).map(Some).ok_or_else(|| self.invalid()),
            _ => Err(self.invalid()),
        }
    }

    /// Parsed value when present and valid; anything else reads as absent
    pub fn lookup(&self, params: &QueryParameters) -> Option<DateTime<Utc>> {
        self.parse(params).ok().flatten()
    }

    fn invalid(&self) -> ValidationError {
        ValidationError::new(format!("{} is not a valid datetime", self.name), &[self.name.as_str()])
    }
}

impl Validator for DateTimeValidator {
    fn id(&self) -> String {
        format!("datetime.{}", self.name)
    }

    fn validate(&self, params: &QueryParameters) -> Result<Parsed, ValidationError> {
        self.parse(params).map(Parsed::from)
    }
}
