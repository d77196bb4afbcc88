//! JSON file store for pending redemptions.
//!
//! The file holds a JSON array of entries. Files written by older releases
//! wrap the array as `{"pending": [...]}`; both shapes are read, only the
//! array is written.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::redemption::PendingRedemption;
use crate::error::{Result, StoreError};
use crate::port::outbound::store::RedemptionStore;

#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedList {
    Entries(Vec<PendingRedemption>),
    Wrapped { pending: Vec<PendingRedemption> },
}

impl PersistedList {
    fn into_entries(self) -> Vec<PendingRedemption> {
        match self {
            Self::Entries(entries) | Self::Wrapped { pending: entries } => entries,
        }
    }
}

/// Stores the pending list in a single JSON file.
///
/// Saves go to a temporary file in the same directory that is then renamed
/// over the target, so readers only ever see a complete list.
#[derive(Debug, Clone)]
pub struct JsonRedemptionStore {
    path: PathBuf,
}

impl JsonRedemptionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.display_path(),
            source,
        }
    }
}

impl RedemptionStore for JsonRedemptionStore {
    fn load(&self) -> Result<Vec<PendingRedemption>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.display_path(),
                    source,
                }
                .into())
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let list: PersistedList =
            serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
                path: self.display_path(),
                source,
            })?;
        Ok(list.into_entries())
    }

    fn save(&self, pending: &[PendingRedemption]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.write_error(e))?;

        let json = serde_json::to_string_pretty(pending)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| self.write_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        debug!(path = %self.path.display(), count = pending.len(), "Saved pending redemptions");
        Ok(())
    }
}
