//! DataSet: metadata joined with the storage that backs it
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::data_model::{DatasetMetadata, StalenessVerdict};
use crate::error::CoreError;
use crate::staleness::evaluate_staleness;
use crate::storage::DataSetStorage;
use crate::{DEFAULT_CACHE_SECONDS, REALTIME_CACHE_SECONDS};

#[derive(Clone)]
pub struct DataSet {
    storage: Arc<dyn DataSetStorage>,
    metadata: DatasetMetadata,
}

impl std::fmt::Debug for DataSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSet")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl DataSet {
    pub fn new(storage: Arc<dyn DataSetStorage>, metadata: DatasetMetadata) -> Self {
        Self { storage, metadata }
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn is_queryable(&self) -> bool {
        self.metadata.queryable
    }

    pub fn is_published(&self) -> bool {
        self.metadata.published
    }

    pub fn is_realtime(&self) -> bool {
        self.metadata.realtime
    }

    pub fn allow_raw_queries(&self) -> bool {
        self.metadata.allow_raw_queries
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.metadata.bearer_token.as_deref()
    }

    pub fn capped_size(&self) -> u64 {
        self.metadata.capped_size
    }

    pub fn auto_ids(&self) -> &[String] {
        &self.metadata.auto_ids
    }

    /// Seconds a query response may be cached for
    pub fn cache_duration(&self) -> u32 {
        if self.is_realtime() {
            REALTIME_CACHE_SECONDS
        } else {
            DEFAULT_CACHE_SECONDS
        }
    }

    pub async fn last_updated(&self) -> Result<Option<DateTime<Utc>>, CoreError> {
        self.storage.last_updated(self.name()).await
    }

    /// Evaluate staleness, sampling `now` once for this data-set
    pub async fn staleness(&self) -> Result<StalenessVerdict, CoreError> {
        let last_updated = self.last_updated().await?;
        Ok(evaluate_staleness(
            self.metadata.max_expected_age,
            last_updated,
            Utc::now(),
        ))
    }

    pub async fn is_stale(&self) -> Result<bool, CoreError> {
        Ok(self.staleness().await?.is_stale)
    }

    /// Create the backing collection if storage does not have one yet
    pub async fn create_if_necessary(&self) -> Result<bool, CoreError> {
        if self.storage.exists(self.name()).await? {
            return Ok(false);
        }
        tracing::info!(data_set = %self.name(), capped_size = self.capped_size(), "creating collection");
        self.storage.create(self.name(), self.capped_size()).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use chrono::Duration;
    use serde_json::json;

    fn data_set(storage: Arc<InMemoryStorage>, meta: DatasetMetadata) -> DataSet {
        DataSet::new(storage, meta)
    }

    #[test]
    fn test_cache_duration() {
        let storage = Arc::new(InMemoryStorage::new());
        let realtime = data_set(storage.clone(), DatasetMetadata::new("rt").realtime(true));
        let batch = data_set(storage, DatasetMetadata::new("batch"));

        assert_eq!(realtime.cache_duration(), 120);
        assert_eq!(batch.cache_duration(), 1800);
    }

    #[tokio::test]
    async fn test_create_if_necessary_only_once() {
        let storage = Arc::new(InMemoryStorage::new());
        let ds = data_set(storage.clone(), DatasetMetadata::new("fresh").with_capped_size(10));

        assert!(ds.create_if_necessary().await.unwrap());
        assert!(!ds.create_if_necessary().await.unwrap());
        assert!(storage.exists("fresh").await.unwrap());
    }

    #[tokio::test]
    async fn test_staleness_reads_storage() {
        let storage = Arc::new(InMemoryStorage::new());
        storage
            .save_record("old", json!({}), Utc::now() - Duration::hours(2))
            .await
            .unwrap();

        let ds = data_set(storage, DatasetMetadata::new("old").with_max_expected_age(3600));
        let verdict = ds.staleness().await.unwrap();

        assert!(verdict.is_stale);
        assert!(verdict.seconds_out_of_date >= 3600);
        assert!(ds.is_stale().await.unwrap());
    }
}
