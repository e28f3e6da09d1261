//! Data Model: DatasetMetadata, StalenessVerdict, DataSetStatus, ErrorInfo
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata record published by the data-set directory.
///
/// The core only ever reads these; the directory owns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Unique data-set name (ex: "govuk-visitors")
    pub name: String,
    #[serde(default)]
    pub queryable: bool,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub realtime: bool,
    /// Seconds; 0 means no staleness policy
    #[serde(rename = "max_age_expected", alias = "max_expected_age", default)]
    pub max_expected_age: u64,
    #[serde(default)]
    pub capped_size: u64,
    #[serde(rename = "raw_queries_allowed", alias = "allow_raw_queries", default)]
    pub allow_raw_queries: bool,
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Fields that need generated identifiers on write
    #[serde(default)]
    pub auto_ids: Vec<String>,
}

impl DatasetMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            queryable: true,
            published: true,
            realtime: false,
            max_expected_age: 0,
            capped_size: 0,
            allow_raw_queries: false,
            bearer_token: None,
            auto_ids: Vec::new(),
        }
    }

    pub fn with_max_expected_age(mut self, seconds: u64) -> Self {
        self.max_expected_age = seconds;
        self
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn queryable(mut self, queryable: bool) -> Self {
        self.queryable = queryable;
        self
    }

    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn with_capped_size(mut self, capped_size: u64) -> Self {
        self.capped_size = capped_size;
        self
    }
}

/// Outcome of checking one data-set against its max-age policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StalenessVerdict {
    pub is_stale: bool,
    /// Only meaningful when `is_stale`
    pub seconds_out_of_date: i64,
    pub last_updated: Option<DateTime<Utc>>,
    pub max_expected_age: u64,
}

impl StalenessVerdict {
    /// Verdict for a data-set where staleness does not apply
    pub fn not_applicable(max_expected_age: u64, last_updated: Option<DateTime<Utc>>) -> Self {
        Self {
            is_stale: false,
            seconds_out_of_date: 0,
            last_updated,
            max_expected_age,
        }
    }
}

/// A stale published data-set, as listed in `/_status/data-sets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSetStatus {
    pub name: String,
    #[serde(rename = "seconds-out-of-date")]
    pub seconds_out_of_date: i64,
    #[serde(rename = "last-updated")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(rename = "max-age-expected")]
    pub max_age_expected: u64,
}

impl DataSetStatus {
    pub fn from_verdict(name: impl Into<String>, verdict: &StalenessVerdict) -> Self {
        Self {
            name: name.into(),
            seconds_out_of_date: verdict.seconds_out_of_date,
            last_updated: verdict.last_updated,
            max_age_expected: verdict.max_expected_age,
        }
    }
}

/// A published data-set whose staleness could not be determined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownStaleness {
    pub name: String,
    pub reason: String,
}

/// Error-info body shared by every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub status: String,
    pub detail: String,
}

impl ErrorInfo {
    pub fn new(status: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            detail: detail.into(),
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self::new("error", detail)
    }
}
