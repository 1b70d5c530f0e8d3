//! Versioned document store abstraction.

use crate::document::{HistoryDocument, HistoryKey, Versioned};
use crate::error::HistoryError;
use crate::file::FileDocumentStore;
use async_trait::async_trait;
use huddle_config::{HistoryConfig, HistoryProvider};
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Persistent store for history documents with compare-and-set writes.
///
/// There is no multi-statement transaction: callers read, merge locally and
/// write back with the version they read. A write whose `expected_version`
/// no longer matches fails with [`HistoryError::Conflict`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load the current document, if one exists.
    async fn load(&self, key: &HistoryKey) -> Result<Option<Versioned<HistoryDocument>>, HistoryError>;

    /// Store `document` if the current version equals `expected_version`.
    ///
    /// `None` means the document must not exist yet. Returns the new version.
    async fn save(
        &self,
        key: &HistoryKey,
        document: HistoryDocument,
        expected_version: Option<u64>,
    ) -> Result<u64, HistoryError>;
}

/// Process-local store, used by default and in tests.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<HistoryKey, Versioned<HistoryDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self, key: &HistoryKey) -> Result<Option<Versioned<HistoryDocument>>, HistoryError> {
        Ok(self.documents.read().get(key).cloned())
    }

    async fn save(
        &self,
        key: &HistoryKey,
        document: HistoryDocument,
        expected_version: Option<u64>,
    ) -> Result<u64, HistoryError> {
        let mut documents = self.documents.write();
        let found = documents.get(key).map(|stored| stored.version);
        if found != expected_version {
            return Err(HistoryError::Conflict {
                key: key.to_string(),
                expected: expected_version,
                found,
            });
        }
        let version = found.unwrap_or(0) + 1;
        documents.insert(
            key.clone(),
            Versioned {
                version,
                value: document,
            },
        );
        debug!("saved history document (key={}, version={})", key, version);
        Ok(version)
    }
}

/// Build the document store selected by the history configuration.
pub fn open_document_store(config: &HistoryConfig) -> Result<Arc<dyn DocumentStore>, HistoryError> {
    match config.provider {
        HistoryProvider::Memory => {
            info!("using in-memory history store");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
        HistoryProvider::File => {
            let path = config.path.as_deref().ok_or_else(|| {
                HistoryError::Config("history.path is required for the file provider".to_string())
            })?;
            Ok(Arc::new(FileDocumentStore::new(path)?))
        }
    }
}
