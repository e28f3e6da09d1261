//! Storage capability consumed by the core.
//!
//! Implementations must tolerate concurrent reads from many tasks without
//! callers taking any lock of their own.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::CoreError;

#[async_trait]
pub trait DataSetStorage: Send + Sync {
    /// Create the backing collection for a data-set
    async fn create(&self, name: &str, capped_size: u64) -> Result<(), CoreError>;

    async fn exists(&self, name: &str) -> Result<bool, CoreError>;

    /// Liveness probe for `/_status`
    async fn alive(&self) -> bool;

    /// Timestamp of the most recent write, `None` if never written
    async fn last_updated(&self, name: &str) -> Result<Option<DateTime<Utc>>, CoreError>;

    async fn save_record(
        &self,
        name: &str,
        record: Value,
        at: DateTime<Utc>,
    ) -> Result<(), CoreError>;
}

#[derive(Debug, Default)]
struct Collection {
    capped_size: u64,
    records: Vec<Value>,
    last_updated: Option<DateTime<Utc>>,
}

/// Process-local storage backed by a `RwLock`ed map of collections.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held for `name`
    pub async fn record_count(&self, name: &str) -> usize {
        self.collections
            .read()
            .await
            .get(name)
            .map(|c| c.records.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl DataSetStorage for InMemoryStorage {
    async fn create(&self, name: &str, capped_size: u64) -> Result<(), CoreError> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Err(CoreError::Storage(format!("collection {} already exists", name)));
        }
        collections.insert(
            name.to_string(),
            Collection {
                capped_size,
                ..Default::default()
            },
        );
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool, CoreError> {
        Ok(self.collections.read().await.contains_key(name))
    }

    async fn alive(&self) -> bool {
        true
    }

    async fn last_updated(&self, name: &str) -> Result<Option<DateTime<Utc>>, CoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(name)
            .and_then(|c| c.last_updated))
    }

    async fn save_record(
        &self,
        name: &str,
        record: Value,
        at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(name.to_string()).or_default();

        collection.records.push(record);
        // Capped collections drop their oldest records first.
        if collection.capped_size > 0 {
            let cap = collection.capped_size as usize;
            if collection.records.len() > cap {
                let excess = collection.records.len() - cap;
                collection.records.drain(..excess);
            }
        }
        collection.last_updated = match collection.last_updated {
            Some(previous) if previous > at => Some(previous),
            _ => Some(at),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[tokio::test]
    async fn test_never_written_has_no_last_updated() {
        let storage = InMemoryStorage::new();
        storage.create("licensing", 0).await.unwrap();

        assert!(storage.exists("licensing").await.unwrap());
        assert_eq!(storage.last_updated("licensing").await.unwrap(), None);
        assert_eq!(storage.last_updated("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_twice_is_an_error() {
        let storage = InMemoryStorage::new();
        storage.create("licensing", 0).await.unwrap();

        let err = storage.create("licensing", 0).await.unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
    }

    #[tokio::test]
    async fn test_last_updated_keeps_most_recent_write() {
        let storage = InMemoryStorage::new();
        let now = Utc::now();

        storage.save_record("visits", json!({"count": 1}), now).await.unwrap();
        storage
            .save_record("visits", json!({"count": 2}), now - Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(storage.last_updated("visits").await.unwrap(), Some(now));
        assert_eq!(storage.record_count("visits").await, 2);
    }

    #[tokio::test]
    async fn test_capped_collection_drops_oldest() {
        let storage = InMemoryStorage::new();
        storage.create("realtime", 2).await.unwrap();
        let now = Utc::now();

        for i in 0..5 {
            storage.save_record("realtime", json!({ "i": i }), now).await.unwrap();
        }

        assert_eq!(storage.record_count("realtime").await, 2);
    }
}
