//! Profile entry models

use serde::{Deserialize, Serialize};

pub type UserId = u64;

/// A single typed value of a profile entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ProfileValue {
    Int(i64),
    Id(u64),
    Str(String),
}

impl ProfileValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ProfileValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<u64> {
        match self {
            ProfileValue::Id(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ProfileValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

/// Address of a profile entry: owner, key and secondary key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileKey {
    pub user_id: UserId,
    pub idx: String,
    #[serde(default)]
    pub idx2: u64,
}

impl ProfileKey {
    pub fn new(user_id: UserId, idx: &str, idx2: u64) -> Self {
        Self {
            user_id,
            idx: idx.to_string(),
            idx2,
        }
    }
}

/// A stored entry, as persisted by the file backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEntry {
    #[serde(flatten)]
    pub key: ProfileKey,
    pub values: Vec<ProfileValue>,
}
