use async_trait::async_trait;
use chrono::Utc;
use huddle_history::{
    DocumentStore, HistoryDocument, HistoryError, HistoryKey, InMemoryDocumentStore, Versioned,
};
use huddle_protocol::ChatMessage;
use parking_lot::Mutex;

/// In-memory store whose next `n` saves fail with a write conflict.
///
/// With an interloper message configured, each failing save is caused by a
/// simulated concurrent writer that appends the interloper first; otherwise
/// the conflict is reported without touching the stored document.
#[derive(Debug, Default)]
pub struct FlakyDocumentStore {
    inner: InMemoryDocumentStore,
    conflicts_left: Mutex<u32>,
    save_attempts: Mutex<u32>,
    interloper: Option<ChatMessage>,
}

impl FlakyDocumentStore {
    pub fn new(conflicts: u32) -> Self {
        Self {
            conflicts_left: Mutex::new(conflicts),
            ..Self::default()
        }
    }

    pub fn with_interloper(mut self, message: ChatMessage) -> Self {
        self.interloper = Some(message);
        self
    }

    /// Make the next `n` saves conflict.
    pub fn fail_next(&self, n: u32) {
        *self.conflicts_left.lock() = n;
    }

    /// Number of saves attempted so far, failed ones included.
    pub fn save_attempts(&self) -> u32 {
        *self.save_attempts.lock()
    }

    fn take_conflict(&self) -> bool {
        let mut left = self.conflicts_left.lock();
        if *left == 0 {
            return false;
        }
        *left -= 1;
        true
    }

    async fn write_interloper(&self, key: &HistoryKey, message: &ChatMessage) -> Result<(), HistoryError> {
        let current = self.inner.load(key).await?;
        let (document, version) = match current {
            Some(stored) => {
                let mut document = stored.value;
                document.messages.push(message.clone());
                (document, Some(stored.version))
            }
            None => (HistoryDocument::first(key, message.clone(), Utc::now()), None),
        };
        self.inner.save(key, document, version).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyDocumentStore {
    async fn load(&self, key: &HistoryKey) -> Result<Option<Versioned<HistoryDocument>>, HistoryError> {
        self.inner.load(key).await
    }

    async fn save(
        &self,
        key: &HistoryKey,
        document: HistoryDocument,
        expected_version: Option<u64>,
    ) -> Result<u64, HistoryError> {
        *self.save_attempts.lock() += 1;
        if self.take_conflict() {
            match &self.interloper {
                Some(message) => self.write_interloper(key, message).await?,
                None => {
                    return Err(HistoryError::Conflict {
                        key: key.to_string(),
                        expected: expected_version,
                        found: expected_version.map(|version| version + 1),
                    });
                }
            }
        }
        self.inner.save(key, document, expected_version).await
    }
}
