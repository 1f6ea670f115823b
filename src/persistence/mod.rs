//! Snapshot persistence for the article store
//!
//! The store talks to persistence through [`SnapshotPort`], a keyed string
//! store in the spirit of browser local storage: it loads once on init and
//! saves after every mutation. Versioning of the payload is the store's
//! concern; ports only move opaque JSON strings.
//!
//! ## Submodules
//!
//! - [`sqlite`] - SQLite key/value table with schema migrations
//! - [`memory`] - process-local map, for tests and ephemeral runs

use crate::config::{PersistenceConfig, SnapshotBackend};
use crate::error::Result;
use crate::types::Article;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod memory;
pub mod sqlite;

pub use memory::MemorySnapshotStore;
pub use sqlite::SqliteSnapshotStore;

/// Version written into every snapshot; others are discarded on load
pub const SNAPSHOT_VERSION: u32 = 1;

/// Keyed storage for serialized store snapshots
#[async_trait]
pub trait SnapshotPort: Send + Sync {
    /// Raw value stored under `key`, if any
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    async fn erase(&self, key: &str) -> Result<()>;
}

/// Persisted shape of the article store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Payload version, compared against [`SNAPSHOT_VERSION`]
    pub version: u32,
    /// Article collection in fetch order
    pub articles: Vec<Article>,
    /// Last search result at the time of saving
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filtered_articles: Vec<Article>,
}

impl StoreSnapshot {
    /// Snapshot at the current version
    pub fn new(articles: Vec<Article>, filtered_articles: Vec<Article>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            articles,
            filtered_articles,
        }
    }

    /// Whether this snapshot was written by a compatible store
    pub fn is_compatible(&self) -> bool {
        self.version == SNAPSHOT_VERSION
    }
}

/// Open the port selected by the persistence config
pub async fn open_port(config: &PersistenceConfig) -> Result<Arc<dyn SnapshotPort>> {
    match config.backend {
        SnapshotBackend::Sqlite => {
            let store = SqliteSnapshotStore::open(&config.database_path).await?;
            Ok(Arc::new(store))
        }
        SnapshotBackend::Memory => Ok(Arc::new(MemorySnapshotStore::new())),
    }
}
