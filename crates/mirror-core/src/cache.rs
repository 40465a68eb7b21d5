use crate::model::{CacheEntry, RepoId};
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

mod backoff;
mod patch;

pub use backoff::RetryPolicy;
pub use patch::CachePatch;

pub type Cache = BTreeMap<RepoId, CacheEntry>;

#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    entries: RwLock<Cache>,
}

impl CacheStore {
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            entries: RwLock::new(load_cache(path)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, id: &RepoId) -> Option<CacheEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn snapshot(&self) -> Cache {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn upsert(&self, id: &RepoId, patch: CachePatch) -> anyhow::Result<CacheEntry> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(id.clone()).or_default();
        patch.apply(entry);
        let merged = entry.clone();
        save_cache(&self.path, &entries).with_context(|| format!("persist cache after {id}"))?;
        Ok(merged)
    }

    pub fn retain_listed(&self, keep: &[RepoId]) -> anyhow::Result<usize> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|id, _| keep.contains(id));
        let removed = before - entries.len();
        if removed > 0 {
            save_cache(&self.path, &entries).context("persist pruned cache")?;
        }
        Ok(removed)
    }
}

pub fn load_cache(path: &Path) -> Cache {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no cache file yet; starting empty");
            return Cache::new();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cache unreadable; starting empty");
            return Cache::new();
        }
    };
    match serde_json::from_str(&data) {
        Ok(cache) => cache,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cache corrupt; starting empty");
            Cache::new()
        }
    }
}

pub fn save_cache(path: &Path, cache: &Cache) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("create cache directory")?;
    }
    let data = serde_json::to_string_pretty(cache).context("serialize cache")?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cache.json".to_string());
    let tmp_path = path.with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

    let result = (|| -> anyhow::Result<()> {
        let mut file = File::create(&tmp_path)
            .with_context(|| format!("create {}", tmp_path.display()))?;
        file.write_all(data.as_bytes()).context("write cache")?;
        file.sync_all().context("sync cache")?;
        fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
        Ok(())
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
