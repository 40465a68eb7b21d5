use crate::cache::Cache;
use crate::model::{CacheEntry, RepoId};

pub const NEVER_SYNCED_PRIORITY: u64 = 24 * 3600;

pub const RETRY_DUE_BONUS: u64 = 48 * 3600;

pub fn priority(entry: Option<&CacheEntry>, now: u64) -> u64 {
    let Some(entry) = entry else {
        return NEVER_SYNCED_PRIORITY;
    };
    let meta = &entry.sync_meta;
    let base = match meta.last_success {
        Some(last) => now.saturating_sub(last),
        None => NEVER_SYNCED_PRIORITY,
    };
    if meta.retry_due(now) {
        base.saturating_add(RETRY_DUE_BONUS)
    } else {
        base
    }
}

pub fn build_queue(repos: &[RepoId], cache: &Cache, now: u64) -> Vec<RepoId> {
    let mut scored: Vec<(u64, &RepoId)> = repos
        .iter()
        .map(|id| (priority(cache.get(id), now), id))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, id)| id.clone()).collect()
}
