//! In-memory `UserDirectory` seeded from a list or a JSON file.
//!
//! The seed file is a JSON array of entries:
//!
//! ```json
//! [{ "email": "alice@x.org", "role": "donor", "status": "active" }]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{DirectoryEntry, Email};

/// Errors raised while loading a directory seed file.
#[derive(Debug, thiserror::Error)]
pub enum DirectorySeedError {
    /// The file could not be read.
    #[error("failed to read directory seed {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a JSON array of directory entries.
    #[error("failed to parse directory seed {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Directory of role and account status held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    entries: RwLock<HashMap<Email, DirectoryEntry>>,
}

impl InMemoryUserDirectory {
    /// Build a directory from `entries`; later duplicates win.
    pub fn with_entries(entries: impl IntoIterator<Item = DirectoryEntry>) -> Self {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|entry| (entry.email.clone(), entry))
                    .collect(),
            ),
        }
    }

    /// Parse a JSON array of entries.
    pub fn from_json(path: &Path, raw: &str) -> Result<Self, DirectorySeedError> {
        let entries: Vec<DirectoryEntry> =
            serde_json::from_str(raw).map_err(|source| DirectorySeedError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::with_entries(entries))
    }

    /// Load entries from a JSON seed file.
    pub fn from_seed_file(path: &Path) -> Result<Self, DirectorySeedError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DirectorySeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &raw)
    }

    /// Insert or replace the entry for its email.
    pub async fn upsert(&self, entry: DirectoryEntry) {
        self.entries.write().await.insert(entry.email.clone(), entry);
    }

    /// Number of known accounts.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the directory holds no accounts.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn lookup(&self, email: &Email) -> Result<Option<DirectoryEntry>, UserDirectoryError> {
        Ok(self.entries.read().await.get(email).cloned())
    }
}
