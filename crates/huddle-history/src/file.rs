//! File-backed document store: one JSON file per history document.

use crate::document::{HistoryDocument, HistoryKey, Versioned};
use crate::error::HistoryError;
use crate::store::DocumentStore;
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Stores `<root>/<workspace>/<participant>.json`, each holding a
/// [`Versioned`] document. Saves are serialized by a process-wide lock so the
/// version check and the rename happen together.
#[derive(Debug)]
pub struct FileDocumentStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileDocumentStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!("initialized file history store (root={})", root.display());
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    fn document_path(&self, key: &HistoryKey) -> PathBuf {
        self.root
            .join(file_component(&key.workspace_id))
            .join(format!("{}.json", file_component(&key.participant_id)))
    }

    fn read_document(&self, path: &Path) -> Result<Option<Versioned<HistoryDocument>>, HistoryError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_document(&self, path: &Path, stored: &Versioned<HistoryDocument>) -> Result<(), HistoryError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("json.tmp");
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            let payload = serde_json::to_vec_pretty(stored)?;
            file.write_all(&payload)?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn load(&self, key: &HistoryKey) -> Result<Option<Versioned<HistoryDocument>>, HistoryError> {
        self.read_document(&self.document_path(key))
    }

    async fn save(
        &self,
        key: &HistoryKey,
        document: HistoryDocument,
        expected_version: Option<u64>,
    ) -> Result<u64, HistoryError> {
        let _guard = self.write_lock.lock();
        let path = self.document_path(key);
        let found = self.read_document(&path)?.map(|stored| stored.version);
        if found != expected_version {
            return Err(HistoryError::Conflict {
                key: key.to_string(),
                expected: expected_version,
                found,
            });
        }
        let stored = Versioned {
            version: found.unwrap_or(0) + 1,
            value: document,
        };
        self.write_document(&path, &stored)?;
        debug!(
            "wrote history document (key={}, version={}, messages={})",
            key,
            stored.version,
            stored.value.messages.len()
        );
        Ok(stored.version)
    }
}

/// Map an id onto a single safe path component.
///
/// Ids are percent-encoded outside `[A-Za-z0-9_-]` so distinct ids never share
/// a file and none can escape the root.
fn file_component(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    if out.is_empty() {
        out.push('%');
    }
    out
}
