//! Query bucketing period
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValidationError;
use crate::params::QueryParameters;
use crate::validator::{Parsed, Validator};

pub const PERIOD: &str = "period";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Hour,
    Day,
    Week,
    Month,
    Quarter,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::Hour,
        Period::Day,
        Period::Week,
        Period::Month,
        Period::Quarter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Hour => "hour",
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Period::ALL.iter().map(Period::as_str).collect();
                ValidationError::new(
                    format!("'period' must be one of {}", allowed.join(", ")),
                    &[PERIOD],
                )
            })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodValidator;

impl PeriodValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, params: &QueryParameters) -> Result<Option<Period>, ValidationError> {
        let Some(values) = params.values(PERIOD) else {
            return Ok(None);
        };

        match values {
            [value] => value.parse().map(Some),
            _ => Err(ValidationError::new(
                format!("period should be a single argument but received {}", values.len()),
                &[PERIOD],
            )),
        }
    }

    /// The period when it is present and valid; errors read as absent
    pub fn lookup(params: &QueryParameters) -> Option<Period> {
        Self::new().parse(params).ok().flatten()
    }
}

impl Validator for PeriodValidator {
    fn id(&self) -> String {
        "period".to_string()
    }

    fn validate(&self, params: &QueryParameters) -> Result<Parsed, ValidationError> {
        self.parse(params).map(Parsed::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_periods_parse() {
        for period in Period::ALL {
            let params = QueryParameters::new().with("period", period.as_str());
            assert_eq!(PeriodValidator::new().parse(&params).unwrap(), Some(period));
        }
    }

    #[test]
    fn test_absent_period() {
        assert_eq!(PeriodValidator::new().parse(&QueryParameters::new()).unwrap(), None);
    }

    #[test]
    fn test_unknown_period_is_rejected() {
        let params = QueryParameters::new().with("period", "fortnight");
        let err = PeriodValidator::new().validate(&params).unwrap_err();

        assert_eq!(err.message, "'period' must be one of hour, day, week, month, quarter");
        assert!(err.concerns("period"));
        assert_eq!(PeriodValidator::lookup(&params), None);
    }

    #[test]
    fn test_repeated_period_is_rejected() {
        let params = QueryParameters::new().with("period", "day").with("period", "week");
        assert!(PeriodValidator::new().parse(&params).is_err());
    }
}
