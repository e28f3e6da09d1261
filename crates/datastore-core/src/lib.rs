//! Datastore Core: dataset metadata, storage capabilities and freshness
//!
//! Storage and the metadata directory are consumed through narrow traits so
//! that handlers receive them by injection instead of reaching for globals.
//!
//! ```text
//! MetadataDirectory ──list──► FreshnessAggregator ──spawn per data-set──► DataSet::staleness
//!                                      │                                      │
//!                                      ▼                                      ▼
//!                              FreshnessReport ◄──────── StalenessVerdict ◄── DataSetStorage
//! ```

pub mod data_model;
pub mod dataset;
pub mod directory;
pub mod error;
pub mod freshness;
pub mod staleness;
pub mod storage;

pub use data_model::{DataSetStatus, DatasetMetadata, ErrorInfo, StalenessVerdict, UnknownStaleness};
pub use dataset::DataSet;
pub use directory::{MetadataDirectory, StaticDirectory};
pub use error::CoreError;
pub use freshness::{FreshnessAggregator, FreshnessReport, StatusSummary};
pub use staleness::evaluate_staleness;
pub use storage::{DataSetStorage, InMemoryStorage};

/// Cache lifetime for realtime data-sets, in seconds
pub const REALTIME_CACHE_SECONDS: u32 = 120;

/// Cache lifetime for everything else, in seconds
pub const DEFAULT_CACHE_SECONDS: u32 = 1800;
