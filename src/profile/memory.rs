//! In-memory profile store
//!
//! Entries live for the lifetime of the process.

use super::models::*;
use super::traits::ProfileStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Profile store backed by a `HashMap` behind an async `RwLock`
#[derive(Default)]
pub struct MemoryProfileStore {
    entries: RwLock<HashMap<ProfileKey, Vec<ProfileValue>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries across all users
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, key: &ProfileKey) -> Result<Option<Vec<ProfileValue>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: ProfileKey, values: Vec<ProfileValue>) -> Result<()> {
        self.entries.write().await.insert(key, values);
        Ok(())
    }

    async fn delete_idx(&self, user_id: UserId, idx: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .retain(|key, _| !(key.user_id == user_id && key.idx == idx));
        Ok(())
    }
}
