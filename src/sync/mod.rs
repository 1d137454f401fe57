// Connection record store
//
// JSON file holding an array of connection records. Read once at startup
// and on user-triggered reloads; rewritten with the full current snapshot
// whenever the live graph changes.

use crate::world::ConnectionRecord;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised by the record store
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("cannot access connection store {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed connection store {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode connections: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed source and sink of connection records
#[derive(Debug, Clone)]
pub struct ConnectionStore {
    path: PathBuf,
}

impl ConnectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored record
    ///
    /// A missing file is an empty store, not an error.
    pub fn load(&self) -> Result<Vec<ConnectionRecord>, SyncError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Connection store not found, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(SyncError::Io {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };

        let records: Vec<ConnectionRecord> =
            serde_json::from_str(&content).map_err(|source| SyncError::Parse {
                path: self.path.display().to_string(),
                source,
            })?;

        info!(path = %self.path.display(), count = records.len(), "Loaded connection records");
        Ok(records)
    }

    /// Replace the stored records with `records`
    pub fn save(&self, records: &[ConnectionRecord]) -> Result<(), SyncError> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json).map_err(|source| SyncError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        debug!(path = %self.path.display(), count = records.len(), "Saved connection records");
        Ok(())
    }
}
