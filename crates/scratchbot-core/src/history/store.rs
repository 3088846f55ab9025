use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::history::session::Session;

/// On-disk shape of the history file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedHistory {
    pub sessions: Vec<Session>,
    pub last_updated: DateTime<Utc>,
}

/// Full-snapshot JSON persistence for the session list.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot. A missing file is an empty history.
    pub async fn load(&self) -> Result<Vec<Session>, StoreError> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No history file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };

        let history: PersistedHistory =
            serde_json::from_str(&data).map_err(|e| StoreError::Corrupt {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        log::info!(
            "Loaded {} sessions from {} (last updated {})",
            history.sessions.len(),
            self.path.display(),
            history.last_updated.to_rfc3339()
        );
        Ok(history.sessions)
    }

    /// Replaces the file with a snapshot of `sessions`.
    pub async fn save(&self, sessions: &[Session]) -> Result<(), StoreError> {
        let history = PersistedHistory {
            sessions: sessions.to_vec(),
            last_updated: Utc::now(),
        };
        let data = serde_json::to_string_pretty(&history)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        // Atomic replace
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        log::debug!("Saved {} sessions to {}", sessions.len(), self.path.display());
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("history.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{\"sessions\": [").unwrap();

        let err = SessionStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("scratchbot").join("history.json");
        let store = SessionStore::new(&path);

        store.save(&[Session::new()]).await.unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw["lastUpdated"].is_string());
        assert_eq!(raw["sessions"][0]["title"], "New chat");
        assert!(raw["sessions"][0]["lastModified"].is_string());
        assert_eq!(raw["sessions"][0]["turns"][0]["role"], "assistant");
    }
}
