//! Freshness Aggregator: concurrent staleness checks across data-sets
//!
//! One task is spawned per published data-set and every handle is joined
//! before the results are summarised, so the report never depends on task
//! completion order.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::data_model::{DataSetStatus, DatasetMetadata, ErrorInfo, UnknownStaleness};
use crate::dataset::DataSet;
use crate::directory::MetadataDirectory;
use crate::error::CoreError;
use crate::storage::DataSetStorage;

/// Default bound on a single last-updated lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

const STATUS_OK: &str = "ok";
const STATUS_NOT_OKAY: &str = "not okay";

enum Outcome {
    Fresh,
    Stale(DataSetStatus),
    Unknown(UnknownStaleness),
}

pub struct FreshnessAggregator {
    storage: Arc<dyn DataSetStorage>,
    lookup_timeout: Duration,
}

impl FreshnessAggregator {
    pub fn new(storage: Arc<dyn DataSetStorage>) -> Self {
        Self {
            storage,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// List every data-set from the directory and check them all.
    ///
    /// A directory failure is returned immediately, before any lookup starts.
    pub async fn check_directory(
        &self,
        directory: &dyn MetadataDirectory,
    ) -> Result<FreshnessReport, CoreError> {
        let data_sets = directory.list_data_sets().await?;
        Ok(self.check_all(data_sets).await)
    }

    pub async fn check_all(&self, data_sets: Vec<DatasetMetadata>) -> FreshnessReport {
        let published: Vec<DatasetMetadata> =
            data_sets.into_iter().filter(|meta| meta.published).collect();

        if published.is_empty() {
            return FreshnessReport::default();
        }

        let checked = published.len();
        let handles: Vec<(String, JoinHandle<Outcome>)> = published
            .into_iter()
            .map(|meta| {
                let name = meta.name.clone();
                let data_set = DataSet::new(self.storage.clone(), meta);
                let handle = tokio::spawn(check_freshness(data_set, self.lookup_timeout));
                (name, handle)
            })
            .collect();

        let mut report = FreshnessReport {
            checked,
            ..Default::default()
        };

        for (name, handle) in handles {
            match handle.await {
                Ok(Outcome::Fresh) => {}
                Ok(Outcome::Stale(status)) => report.stale.push(status),
                Ok(Outcome::Unknown(unknown)) => report.unknown.push(unknown),
                Err(join_err) => {
                    tracing::warn!(data_set = %name, error = %join_err, "staleness task failed");
                    report.unknown.push(UnknownStaleness {
                        name,
                        reason: join_err.to_string(),
                    });
                }
            }
        }

        report.stale.sort_by(|a, b| a.name.cmp(&b.name));
        report.unknown.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::info!(
            checked = report.checked,
            stale = report.stale.len(),
            unknown = report.unknown.len(),
            "data-set freshness checked"
        );
        report
    }
}

async fn check_freshness(data_set: DataSet, timeout: Duration) -> Outcome {
    let lookup = tokio::time::timeout(timeout, data_set.staleness()).await;

    let result = match lookup {
        Ok(result) => result,
        Err(_) => Err(CoreError::Timeout {
            name: data_set.name().to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    };

    match result {
        Ok(verdict) if verdict.is_stale => {
            tracing::debug!(
                data_set = %data_set.name(),
                seconds_out_of_date = verdict.seconds_out_of_date,
                "data-set is stale"
            );
            Outcome::Stale(DataSetStatus::from_verdict(data_set.name(), &verdict))
        }
        Ok(_) => Outcome::Fresh,
        Err(err) => {
            tracing::warn!(data_set = %data_set.name(), error = %err, "cannot determine staleness");
            Outcome::Unknown(UnknownStaleness {
                name: data_set.name().to_string(),
                reason: err.detail(),
            })
        }
    }
}

/// Aggregate outcome of one freshness pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreshnessReport {
    /// Number of published data-sets examined
    pub checked: usize,
    pub stale: Vec<DataSetStatus>,
    pub unknown: Vec<UnknownStaleness>,
}

impl FreshnessReport {
    pub fn is_ok(&self) -> bool {
        self.stale.is_empty()
    }

    /// "1 data-set is out of date" / "3 data-sets are out of date"
    pub fn detail(&self) -> Option<String> {
        if self.is_ok() {
            return None;
        }
        Some(format!(
            "{} {} out of date",
            self.stale.len(),
            pluralise_data_sets(self.stale.len())
        ))
    }

    pub fn to_error_info(&self) -> Option<ErrorInfo> {
        self.detail()
            .map(|detail| ErrorInfo::new(STATUS_NOT_OKAY, detail))
    }

    pub fn summary(&self) -> StatusSummary {
        StatusSummary {
            status: if self.is_ok() { STATUS_OK } else { STATUS_NOT_OKAY }.to_string(),
            detail: self.detail(),
            data_sets: self.stale.clone(),
            unknown: self.unknown.clone(),
        }
    }
}

fn pluralise_data_sets(count: usize) -> &'static str {
    if count > 1 {
        "data-sets are"
    } else {
        "data-set is"
    }
}

/// Body of `GET /_status/data-sets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "data-sets", skip_serializing_if = "Vec::is_empty")]
    pub data_sets: Vec<DataSetStatus>,
    #[serde(rename = "unknown-data-sets", skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<UnknownStaleness>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(name: &str) -> DataSetStatus {
        DataSetStatus {
            name: name.to_string(),
            seconds_out_of_date: 1,
            last_updated: None,
            max_age_expected: 1,
        }
    }

    #[test]
    fn test_empty_report_is_ok() {
        let report = FreshnessReport::default();
        assert!(report.is_ok());
        assert_eq!(report.detail(), None);
        assert_eq!(report.to_error_info(), None);

        let json = serde_json::to_value(report.summary()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }

    #[test]
    fn test_detail_singular_and_plural() {
        let one = FreshnessReport {
            checked: 3,
            stale: vec![status("a")],
            unknown: vec![],
        };
        assert_eq!(one.detail().unwrap(), "1 data-set is out of date");

        let two = FreshnessReport {
            checked: 3,
            stale: vec![status("a"), status("b")],
            unknown: vec![],
        };
        assert_eq!(two.detail().unwrap(), "2 data-sets are out of date");
        assert_eq!(two.to_error_info().unwrap().status, "not okay");
    }

    #[test]
    fn test_unknown_alone_keeps_status_ok() {
        let report = FreshnessReport {
            checked: 1,
            stale: vec![],
            unknown: vec![UnknownStaleness {
                name: "flaky".to_string(),
                reason: "connection reset".to_string(),
            }],
        };
        let json = serde_json::to_value(report.summary()).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["unknown-data-sets"][0]["name"], "flaky");
        assert!(json.get("detail").is_none());
    }
}
