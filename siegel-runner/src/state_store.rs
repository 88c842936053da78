//! JSON persistence of the previous run's signal.
//!
//! The file holds exactly one `PersistedState`. A missing, empty or unreadable
//! document counts as "no prior run" so a damaged file triggers a fresh
//! notification instead of blocking every future run.

use std::path::{Path, PathBuf};

use siegel_core::domain::PersistedState;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StateStoreError {
        StateStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Load the prior state. `Ok(None)` when there is no usable prior run.
    pub fn load(&self) -> Result<Option<PersistedState>, StateStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no prior state");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            warn!(path = %self.path.display(), "state file is empty, treating as first run");
            return Ok(None);
        }

        match serde_json::from_str(&content) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "state file is corrupt, treating as first run"
                );
                Ok(None)
            }
        }
    }

    /// Save atomically: write a sibling temp file, then rename over the target.
    /// Creates parent directories if needed.
    pub fn save(&self, state: &PersistedState) -> Result<(), StateStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(state)?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), "state saved");
        Ok(())
    }
}
