//! MongoDB-backed metadata store.

use mongodb::Client;
use tokio::sync::OnceCell;
use tracing::debug;

use super::{MetadataStore, Result};
use crate::models::config::StoreConfig;
use crate::models::record::FileRecord;

/// Inserts records into one fixed collection.
///
/// The client is created on the first insert and reused for the rest of the run.
pub struct MongoStore {
    config: StoreConfig,
    client: OnceCell<Client>,
}

impl MongoStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "{} {}.{}",
            self.config.uri, self.config.database, self.config.collection
        )
    }

    async fn client(&self) -> Result<&Client> {
        let client = self
            .client
            .get_or_try_init(|| async {
                debug!("Connecting to {}", self.config.uri);
                Client::with_uri_str(&self.config.uri).await
            })
            .await?;
        Ok(client)
    }
}

impl MetadataStore for MongoStore {
    async fn insert(&self, record: &FileRecord) -> Result<String> {
        let collection = self
            .client()
            .await?
            .database(&self.config.database)
            .collection::<FileRecord>(&self.config.collection);

        let result = collection.insert_one(record).await?;
        let id = match result.inserted_id.as_object_id() {
            Some(oid) => oid.to_hex(),
            None => result.inserted_id.to_string(),
        };

        debug!(
            "Inserted record for {} into '{}' with _id {}",
            record.source_pdf, self.config.collection, id
        );
        Ok(id)
    }
}
