//! ProfileStore trait definition
//!
//! Per-user key-value preference storage. Entries are addressed by
//! `(user id, idx, idx2)` and hold an ordered list of typed values.

use super::models::*;
use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for profile storage backends.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Values stored under a key, `None` if the key was never written or was deleted
    async fn get(&self, key: &ProfileKey) -> Result<Option<Vec<ProfileValue>>>;

    /// Replace the values stored under a key
    async fn set(&self, key: ProfileKey, values: Vec<ProfileValue>) -> Result<()>;

    /// Delete every entry of a user under `idx`, whatever its `idx2`
    async fn delete_idx(&self, user_id: UserId, idx: &str) -> Result<()>;
}
