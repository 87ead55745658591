//! Per-user profile storage
//!
//! Provides:
//! - the `ProfileStore` backend trait with in-memory and JSON-file backends
//! - `UserProfile`, a typed view of one user's entries

pub mod file;
pub mod memory;
pub mod models;
pub mod traits;

pub use file::FileProfileStore;
pub use memory::MemoryProfileStore;
pub use models::*;
pub use traits::ProfileStore;

use anyhow::Result;
use tracing::debug;

/// Typed accessors over one user's profile entries.
///
/// Scalars are stored as one-element lists. Reads fall back to the given
/// default when the key is absent, empty, or holds values of another type.
pub struct UserProfile<'a> {
    store: &'a dyn ProfileStore,
    user_id: UserId,
}

impl<'a> UserProfile<'a> {
    pub fn new(store: &'a dyn ProfileStore, user_id: UserId) -> Self {
        Self { store, user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    async fn values(&self, idx: &str, idx2: u64) -> Result<Vec<ProfileValue>> {
        let key = ProfileKey::new(self.user_id, idx, idx2);
        Ok(self.store.get(&key).await?.unwrap_or_default())
    }

    async fn write(&self, idx: &str, idx2: u64, values: Vec<ProfileValue>) -> Result<()> {
        debug!(user_id = self.user_id, idx, idx2, count = values.len(), "Updating profile");
        self.store
            .set(ProfileKey::new(self.user_id, idx, idx2), values)
            .await
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn get_int(&self, idx: &str, default: i64) -> Result<i64> {
        let values = self.values(idx, 0).await?;
        Ok(values.first().and_then(ProfileValue::as_int).unwrap_or(default))
    }

    pub async fn get_str(&self, idx: &str, default: &str, idx2: u64) -> Result<String> {
        let values = self.values(idx, idx2).await?;
        Ok(values
            .first()
            .and_then(ProfileValue::as_str)
            .unwrap_or(default)
            .to_string())
    }

    pub async fn get_ids(&self, idx: &str) -> Result<Vec<u64>> {
        let values = self.values(idx, 0).await?;
        Ok(values.iter().filter_map(ProfileValue::as_id).collect())
    }

    pub async fn get_strs(&self, idx: &str) -> Result<Vec<String>> {
        let values = self.values(idx, 0).await?;
        Ok(values
            .iter()
            .filter_map(ProfileValue::as_str)
            .map(str::to_string)
            .collect())
    }

    // ========================================================================
    // Writes
    // ========================================================================

    pub async fn update_int(&self, idx: &str, value: i64) -> Result<()> {
        self.write(idx, 0, vec![ProfileValue::Int(value)]).await
    }

    pub async fn update_str(&self, idx: &str, value: &str, idx2: u64) -> Result<()> {
        self.write(idx, idx2, vec![ProfileValue::Str(value.to_string())])
            .await
    }

    pub async fn update_ids(&self, idx: &str, ids: &[u64]) -> Result<()> {
        self.write(idx, 0, ids.iter().copied().map(ProfileValue::Id).collect())
            .await
    }

    pub async fn update_strs(&self, idx: &str, values: &[String]) -> Result<()> {
        self.write(
            idx,
            0,
            values.iter().cloned().map(ProfileValue::Str).collect(),
        )
        .await
    }

    pub async fn delete_idx(&self, idx: &str) -> Result<()> {
        debug!(user_id = self.user_id, idx, "Deleting profile key");
        self.store.delete_idx(self.user_id, idx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_when_absent() {
        let store = MemoryProfileStore::new();
        let profile = UserProfile::new(&store, 1);

        assert_eq!(profile.get_int("k", 7).await.unwrap(), 7);
        assert_eq!(profile.get_str("k", "now-1h", 0).await.unwrap(), "now-1h");
        assert!(profile.get_ids("k").await.unwrap().is_empty());
        assert!(profile.get_strs("k").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_typed_roundtrip() {
        let store = MemoryProfileStore::new();
        let profile = UserProfile::new(&store, 1);

        profile.update_int("type", 1).await.unwrap();
        profile.update_ids("ids", &[10, 11]).await.unwrap();
        profile
            .update_strs("patterns", &["web*".to_string(), "db*".to_string()])
            .await
            .unwrap();
        profile.update_str("from", "now-2h", 0).await.unwrap();

        assert_eq!(profile.get_int("type", 0).await.unwrap(), 1);
        assert_eq!(profile.get_ids("ids").await.unwrap(), vec![10, 11]);
        assert_eq!(
            profile.get_strs("patterns").await.unwrap(),
            vec!["web*", "db*"]
        );
        assert_eq!(profile.get_str("from", "now-1h", 0).await.unwrap(), "now-2h");
    }

    #[tokio::test]
    async fn test_type_mismatch_falls_back_to_default() {
        let store = MemoryProfileStore::new();
        let profile = UserProfile::new(&store, 1);

        profile.update_str("type", "pattern", 0).await.unwrap();
        assert_eq!(profile.get_int("type", 0).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_idx() {
        let store = MemoryProfileStore::new();
        let profile = UserProfile::new(&store, 1);

        profile.update_ids("ids", &[1]).await.unwrap();
        profile.delete_idx("ids").await.unwrap();
        assert!(profile.get_ids("ids").await.unwrap().is_empty());
        assert!(store.is_empty().await);
    }
}
