//! Validator Trait: single contract for every query-parameter check
use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::params::QueryParameters;
use crate::period::Period;

/// What a validator produced for its field(s)
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// The field was not supplied, or the rule did not apply
    Absent,
    DateTime(DateTime<Utc>),
    Int(u32),
    Period(Period),
    /// Span of a window in days
    Days(f64),
}

impl Parsed {
    pub fn is_absent(&self) -> bool {
        matches!(self, Parsed::Absent)
    }
}

impl From<Option<DateTime<Utc>>> for Parsed {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(Parsed::Absent, Parsed::DateTime)
    }
}

impl From<Option<Period>> for Parsed {
    fn from(value: Option<Period>) -> Self {
        value.map_or(Parsed::Absent, Parsed::Period)
    }
}

/// A pure check over the full parameter map.
///
/// Must be side-effect free: validators call each other to read the parsed
/// value of a sibling field, and the pipeline may call any of them again.
pub trait Validator: Send + Sync {
    /// Stable id (ex: "datetime.start_at")
    fn id(&self) -> String;

    fn validate(&self, params: &QueryParameters) -> Result<Parsed, ValidationError>;
}
