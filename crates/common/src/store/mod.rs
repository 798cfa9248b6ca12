//! Article store: durable graph snapshot
//!
//! The snapshot is one JSON document (`{nodes, links}`), read in full at the
//! start of a query or update and written in full at the end of an update.
//!
//! # Single writer
//!
//! Stores do not coordinate concurrent writers. Two overlapping updates
//! against the same store lose one of the writes; callers must serialize
//! updates (the gateway holds a mutex around the update pipeline).

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::GraphSnapshot;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot at {path} is not valid JSON: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Repository abstraction over the persisted snapshot
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Load the current snapshot; a store that was never written is empty
    async fn load(&self) -> StoreResult<GraphSnapshot>;

    /// Replace the snapshot
    async fn save(&self, snapshot: &GraphSnapshot) -> StoreResult<()>;

    /// Readiness probe
    async fn check(&self) -> StoreResult<()> {
        self.load().await.map(|_| ())
    }
}

/// Snapshot stored as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "articles.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ArticleStore for JsonFileStore {
    async fn load(&self) -> StoreResult<GraphSnapshot> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot yet, starting empty");
                return Ok(GraphSnapshot::default());
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: GraphSnapshot =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.display().to_string(),
                source,
            })?;

        debug!(
            path = %self.path.display(),
            nodes = snapshot.nodes.len(),
            links = snapshot.links.len(),
            "Snapshot loaded"
        );

        Ok(snapshot)
    }

    async fn save(&self, snapshot: &GraphSnapshot) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_vec_pretty(snapshot)?;

        // Write-then-rename so readers never observe a half-written document
        let temp = self.temp_path();
        tokio::fs::write(&temp, &body).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        info!(
            path = %self.path.display(),
            nodes = snapshot.nodes.len(),
            links = snapshot.links.len(),
            bytes = body.len(),
            "Snapshot saved"
        );

        Ok(())
    }
}

/// In-memory store, used in tests and for dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RwLock<GraphSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: GraphSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn load(&self) -> StoreResult<GraphSnapshot> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, snapshot: &GraphSnapshot) -> StoreResult<()> {
        *self.snapshot.write().await = snapshot.clone();
        Ok(())
    }
}
