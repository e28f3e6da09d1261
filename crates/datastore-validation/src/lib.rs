//! Datastore Validation: query time-window checks
//!
//! Every validator sees the whole parameter map, because most rules depend
//! on a sibling field (`period`, `start_at`). A missing field is never an
//! error at the validator level; co-requirements live in [`DurationValidator`].
//!
//! # Example
//!
//! ```
//! use datastore_validation::{QueryParameters, ValidationPipeline};
//!
//! let params = QueryParameters::new()
//!     .with("start_at", "2024-01-01T00:00:00Z")
//!     .with("end_at", "2024-01-09T00:00:00Z")
//!     .with("period", "day");
//!
//! let window = ValidationPipeline::for_query(7).validate(&params).unwrap();
//! assert_eq!(window.period.map(|p| p.as_str()), Some("day"));
//!
//! let params = QueryParameters::new().with("start_at", "2024-01-01T00:00:00Z");
//! let err = ValidationPipeline::for_query(7).validate(&params).unwrap_err();
//! assert_eq!(err.message, "Use of 'start_at' requires 'end_at' or 'duration'");
//! ```

pub mod alignment;
pub mod datetime;
pub mod duration;
pub mod error;
pub mod params;
pub mod period;
pub mod pipeline;
pub mod timespan;
pub mod validator;

pub use alignment::{MidnightValidator, MondayValidator, MonthValidator};
pub use datetime::{parse_datetime, DateTimeValidator};
pub use duration::DurationValidator;
pub use error::ValidationError;
pub use params::QueryParameters;
pub use period::{Period, PeriodValidator};
pub use pipeline::{ParsedWindow, ValidationPipeline, ValidationReport};
pub use timespan::TimespanValidator;
pub use validator::{Parsed, Validator};

/// Minimum span, in days, for queries bucketed coarser than an hour
pub const DEFAULT_MIN_TIMESPAN_DAYS: u32 = 7;
