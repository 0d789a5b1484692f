// ============================
// crates/guard-lib/src/storage/file.rs
// ============================
//! Flat-file identity storage: one JSON record per line, with an in-memory
//! index rebuilt at startup.
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use authgate_common::IdentityRecord;
use async_trait::async_trait;
use tokio::fs as tokio_fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::warn;

use super::{normalize, IdentityStore, StorageError};

const RECORDS_FILE: &str = "identities.jsonl";

/// Index over the records file. Keys are held separately per field so a
/// lookup or collision check never scans the whole record set.
#[derive(Default)]
struct Index {
    records: Vec<IdentityRecord>,
    by_username: HashMap<String, usize>,
    by_identity_key: HashMap<String, usize>,
    by_email: HashMap<String, usize>,
    next_id: i64,
}

impl Index {
    fn collides(&self, record: &IdentityRecord) -> bool {
        self.by_username.contains_key(&record.username)
            || self.by_identity_key.contains_key(&record.identity_key)
            || record
                .email()
                .is_some_and(|email| self.by_email.contains_key(email))
    }

    fn insert(&mut self, record: IdentityRecord) {
        let slot = self.records.len();
        self.by_username.insert(record.username.clone(), slot);
        self.by_identity_key.insert(record.identity_key.clone(), slot);
        if let Some(email) = record.email() {
            self.by_email.insert(email.to_string(), slot);
        }
        self.next_id = self.next_id.max(record.id) + 1;
        self.records.push(record);
    }

    fn get(&self, email: Option<&str>, username: Option<&str>) -> Option<&IdentityRecord> {
        let by_email = email.and_then(|email| self.by_email.get(email));
        let by_username = username.and_then(|username| self.by_username.get(username));
        by_email
            .or(by_username)
            .map(|&slot| &self.records[slot])
    }
}

/// Flat-file implementation of the [`IdentityStore`] trait.
pub struct FileStore {
    path: PathBuf,
    index: RwLock<Index>,
}

impl FileStore {
    /// Open (or create) the records file under `root` and rebuild the index.
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        let path = root.join(RECORDS_FILE);

        let mut index = Index::default();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            for line in content.lines().filter(|line| !line.trim().is_empty()) {
                let record: IdentityRecord = serde_json::from_str(line)?;
                index.insert(record);
            }
        }

        Ok(Self {
            path,
            index: RwLock::new(index),
        })
    }

    /// Check-then-append under the write lock. The index is only updated
    /// once the line is fully on disk, so a failed append leaves no record
    /// behind.
    async fn try_add(&self, record: &IdentityRecord) -> Result<bool, StorageError> {
        let mut index = self.index.write().await;
        if index.collides(record) {
            return Err(StorageError::AlreadyExists);
        }

        let stored = IdentityRecord {
            id: index.next_id.max(1),
            ..record.clone()
        };
        let mut line = serde_json::to_string(&stored)
            .map_err(|err| StorageError::Backend(err.to_string()))?;
        line.push('\n');

        let mut file = tokio_fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|_| StorageError::Unavailable)?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|_| StorageError::Unavailable)?;
        file.flush()
            .await
            .map_err(|_| StorageError::Unavailable)?;

        index.insert(stored);
        Ok(true)
    }
}

#[async_trait]
impl IdentityStore for FileStore {
    async fn add(&self, record: &IdentityRecord) -> Result<bool, StorageError> {
        match self.try_add(record).await {
            Err(StorageError::Unavailable) => {
                warn!(path = %self.path.display(), "records file unavailable, identity not added");
                Ok(false)
            }
            other => other,
        }
    }

    async fn find(&self, email: Option<&str>, username: Option<&str>) -> Option<IdentityRecord> {
        let email = normalize(email);
        let username = normalize(username);
        if email.is_none() && username.is_none() {
            return None;
        }
        let index = self.index.read().await;
        index.get(email, username).cloned()
    }
}
