// src/state/store.rs
use crate::health::StatusRecord;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to create state directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize status record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write state file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where the last observation lives between runs.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Best effort. Missing or unreadable state is `None`, never an error.
    async fn read_previous(&self) -> Option<StatusRecord>;

    /// Replace whatever is stored with `record`.
    async fn write(&self, record: &StatusRecord) -> Result<(), StateError>;
}

/// JSON file on disk, replaced wholesale on every write.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write `contents` to a uniquely named file next to `path`, then rename it
/// over `path`. Overlapping writers each stage their own file; the last
/// rename wins.
fn replace_file(path: &Path, contents: &[u8]) -> Result<(), StateError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err = |source| StateError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    staged.write_all(contents).map_err(write_err)?;
    staged.as_file().sync_all().map_err(write_err)?;
    staged.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn read_previous(&self) -> Option<StatusRecord> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No previous state at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Ignoring unreadable state file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Ignoring malformed state file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    async fn write(&self, record: &StatusRecord) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StateError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let mut json = serde_json::to_string_pretty(record)?;
        json.push('\n');

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&path, json.as_bytes()))
            .await
            .map_err(|e| StateError::Write {
                path: self.path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e),
            })??;

        debug!("Wrote state to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the record in memory. Used by `--dry-run` and tests.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    record: RwLock<Option<StatusRecord>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: StatusRecord) -> Self {
        Self {
            record: RwLock::new(Some(record)),
        }
    }

    pub async fn current(&self) -> Option<StatusRecord> {
        self.record.read().await.clone()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn read_previous(&self) -> Option<StatusRecord> {
        self.current().await
    }

    async fn write(&self, record: &StatusRecord) -> Result<(), StateError> {
        *self.record.write().await = Some(record.clone());
        Ok(())
    }
}
