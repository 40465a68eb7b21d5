use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(String);

impl RepoId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn split(&self) -> Option<(&str, &str)> {
        let (owner, name) = self.0.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some((owner, name))
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RepoId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub download_url: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RepoMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReleaseInfo {
    pub tag: String,
    pub assets: Vec<Asset>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMeta {
    #[serde(default)]
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_retry: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_success: Option<u64>,
}

impl SyncMeta {
    pub fn in_cooldown(&self, now: u64) -> bool {
        matches!(self.next_retry, Some(until) if until > now)
    }

    pub fn retry_due(&self, now: u64) -> bool {
        matches!(self.next_retry, Some(until) if until <= now)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
    #[serde(default)]
    pub meta: RepoMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<u64>,
    #[serde(rename = "_syncMeta", default)]
    pub sync_meta: SyncMeta,
}

impl CacheEntry {
    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.name == name)
    }

    pub fn status(&self, max_retries: u32) -> RepoStatus {
        let attempts = self.sync_meta.attempts;
        if attempts >= max_retries && attempts > 0 {
            RepoStatus::Failed
        } else if attempts > 0 {
            RepoStatus::Retrying
        } else if self.sync_meta.last_success.is_some() {
            RepoStatus::Ok
        } else {
            RepoStatus::NeverSynced
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoStatus {
    NeverSynced,
    Ok,
    Retrying,
    Failed,
}

impl RepoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoStatus::NeverSynced => "never_synced",
            RepoStatus::Ok => "ok",
            RepoStatus::Retrying => "retrying",
            RepoStatus::Failed => "failed",
        }
    }

    pub fn of(entry: Option<&CacheEntry>, max_retries: u32) -> Self {
        entry
            .map(|entry| entry.status(max_retries))
            .unwrap_or(RepoStatus::NeverSynced)
    }
}

impl fmt::Display for RepoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
