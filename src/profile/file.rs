//! JSON-file profile store
//!
//! Keeps all entries in memory and rewrites the whole file after each
//! mutation, so preferences survive restarts.

use super::models::*;
use super::traits::ProfileStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// Profile store persisted to a single JSON file
pub struct FileProfileStore {
    path: PathBuf,
    entries: RwLock<HashMap<ProfileKey, Vec<ProfileValue>>>,
}

impl FileProfileStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                let list: Vec<ProfileEntry> = serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse profile file {}", path.display()))?;
                list.into_iter().map(|e| (e.key, e.values)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No profile file at {}, starting empty", path.display());
                HashMap::new()
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read profile file {}", path.display()))
            }
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Write all entries to a temporary file, then move it over the store file
    async fn persist(&self, entries: &HashMap<ProfileKey, Vec<ProfileValue>>) -> Result<()> {
        let mut list: Vec<ProfileEntry> = entries
            .iter()
            .map(|(key, values)| ProfileEntry {
                key: key.clone(),
                values: values.clone(),
            })
            .collect();
        list.sort_by(|a, b| {
            (a.key.user_id, &a.key.idx, a.key.idx2).cmp(&(b.key.user_id, &b.key.idx, b.key.idx2))
        });

        let json = serde_json::to_string_pretty(&list)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn get(&self, key: &ProfileKey) -> Result<Option<Vec<ProfileValue>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    // Mutations are applied to a copy and swapped in only once written.
    async fn set(&self, key: ProfileKey, values: Vec<ProfileValue>) -> Result<()> {
        let mut entries = self.entries.write().await;
        let mut updated = entries.clone();
        updated.insert(key, values);
        self.persist(&updated).await?;
        *entries = updated;
        Ok(())
    }

    async fn delete_idx(&self, user_id: UserId, idx: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        let mut updated = entries.clone();
        updated.retain(|key, _| !(key.user_id == user_id && key.idx == idx));
        if updated.len() == entries.len() {
            return Ok(());
        }
        self.persist(&updated).await?;
        *entries = updated;
        Ok(())
    }
}
