//! Metadata recording for processed source files.

mod jsonl;
mod mongo;

pub use jsonl::JsonlStore;
pub use mongo::MongoStore;

use std::future::Future;

use crate::error::StoreError;
use crate::models::config::{StoreConfig, StoreKind};
use crate::models::record::FileRecord;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Sink for per-file records.
///
/// Every call is an unconditional insert: no deduplication, no upsert.
pub trait MetadataStore {
    /// Insert one record and return the id assigned by the store.
    fn insert(&self, record: &FileRecord) -> impl Future<Output = Result<String>> + Send;
}

/// Store selected by configuration.
pub enum StoreBackend {
    Mongo(MongoStore),
    Jsonl(JsonlStore),
}

impl StoreBackend {
    /// Build the backend named in `config`. No connection is made yet.
    pub fn from_config(config: &StoreConfig) -> Self {
        match config.backend {
            StoreKind::Mongo => Self::Mongo(MongoStore::new(config.clone())),
            StoreKind::Jsonl => Self::Jsonl(JsonlStore::new(&config.jsonl_path)),
        }
    }

    /// Human-readable destination, for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Mongo(store) => store.describe(),
            Self::Jsonl(store) => store.path().display().to_string(),
        }
    }
}

impl MetadataStore for StoreBackend {
    async fn insert(&self, record: &FileRecord) -> Result<String> {
        match self {
            Self::Mongo(store) => store.insert(record).await,
            Self::Jsonl(store) => store.insert(record).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_backend_from_config() {
        let mut config = StoreConfig::default();
        let backend = StoreBackend::from_config(&config);
        assert!(matches!(backend, StoreBackend::Mongo(_)));
        assert_eq!(backend.describe(), "mongodb://localhost:27017/ invoice_db.all_invoices");

        config.backend = StoreKind::Jsonl;
        config.jsonl_path = PathBuf::from("records.jsonl");
        let backend = StoreBackend::from_config(&config);
        assert!(matches!(backend, StoreBackend::Jsonl(_)));
        assert_eq!(backend.describe(), "records.jsonl");
    }
}
