//! Read-only source of data-set metadata
use std::path::Path;

use async_trait::async_trait;

use crate::data_model::DatasetMetadata;
use crate::error::CoreError;

#[async_trait]
pub trait MetadataDirectory: Send + Sync {
    async fn list_data_sets(&self) -> Result<Vec<DatasetMetadata>, CoreError>;

    async fn data_set(&self, name: &str) -> Result<Option<DatasetMetadata>, CoreError> {
        Ok(self
            .list_data_sets()
            .await?
            .into_iter()
            .find(|meta| meta.name == name))
    }
}

/// Directory over a fixed list of records, optionally loaded from JSON.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    data_sets: Vec<DatasetMetadata>,
}

impl StaticDirectory {
    pub fn new(data_sets: Vec<DatasetMetadata>) -> Self {
        Self { data_sets }
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let data_sets: Vec<DatasetMetadata> =
            serde_json::from_str(json).map_err(|e| CoreError::Metadata(e.to_string()))?;
        Ok(Self::new(data_sets))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Metadata(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.data_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_sets.is_empty()
    }
}

#[async_trait]
impl MetadataDirectory for StaticDirectory {
    async fn list_data_sets(&self) -> Result<Vec<DatasetMetadata>, CoreError> {
        Ok(self.data_sets.clone())
    }
}
