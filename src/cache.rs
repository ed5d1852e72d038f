//! Durable tool-list cache.
//!
//! One serialized tool list at a fixed per-user path, overwritten on every
//! successful fetch and read back as the fallback when the remote endpoint is
//! unreachable. Absence is a normal state, never an error. Writes go through
//! a temp file followed by a rename, so a concurrent reader sees either the
//! old list or the new one, never a truncated file.

use crate::protocol::ToolList;
use crate::types::{CacheConfig, Error, Result};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const CACHE_SUBDIR: &str = "mcp-relay";
const CACHE_FILE: &str = "tools-list-cache.json";

/// File-backed store for the last-known-good tool list.
#[derive(Debug)]
pub struct ToolCache {
    path: PathBuf,
    // Single-writer discipline; readers go through the rename barrier instead.
    write_lock: Mutex<()>,
}

impl ToolCache {
    pub fn new(config: &CacheConfig) -> Self {
        let dir = config
            .dir
            .clone()
            .unwrap_or_else(|| default_cache_dir().join(CACHE_SUBDIR));
        Self::at_path(dir.join(CACHE_FILE))
    }

    /// Store backed by an explicit file path.
    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached list. Missing, unreadable, or unparsable caches all
    /// come back as `None`.
    pub async fn load(&self) -> Option<ToolList> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("no tool cache at {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_slice::<ToolList>(&bytes) {
            Ok(tools) => Some(tools),
            Err(e) => {
                tracing::warn!(
                    "discarding unparsable tool cache at {}: {}",
                    self.path.display(),
                    e,
                );
                None
            }
        }
    }

    /// Persist the list, creating the cache directory if needed.
    pub async fn save(&self, tools: &ToolList) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::internal("cache path has no parent directory"))?;
        tokio::fs::create_dir_all(parent).await?;

        let data = serde_json::to_vec(tools)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!("tool list cache saved ({} tools)", tools.len());
        Ok(())
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir().unwrap_or_else(std::env::temp_dir)
}
