use super::shared::{acquire_lock, resolve_cache_path};
use super::*;
use mirror_core::cache::Cache;
use mirror_core::model::RepoId;

pub(super) fn handle_status(args: StatusArgs) -> anyhow::Result<()> {
    let repos = TrackedRepos::load(&args.store.repo_list)?;
    let cache = CacheStore::open(&resolve_cache_path(&args.store)?).snapshot();
    for line in status_lines(&repos.snapshot(), &cache, args.max_retries) {
        println!("{line}");
    }
    Ok(())
}

pub(super) fn status_lines(repos: &[RepoId], cache: &Cache, max_retries: u32) -> Vec<String> {
    repos
        .iter()
        .map(|id| {
            let entry = cache.get(id);
            let status = RepoStatus::of(entry, max_retries);
            let version = entry
                .and_then(|entry| entry.version.as_deref())
                .unwrap_or("-");
            let mut line = format!("{id}  {}  {version}", status.as_str());
            if let Some(entry) = entry {
                line.push_str(&format!(
                    "  last_success={}",
                    format_epoch(entry.sync_meta.last_success)
                ));
                if entry.sync_meta.attempts > 0 {
                    line.push_str(&format!(
                        "  attempts={}  next_retry={}",
                        entry.sync_meta.attempts,
                        format_epoch(entry.sync_meta.next_retry)
                    ));
                }
            }
            line
        })
        .collect()
}

pub(super) fn handle_prune(args: PruneArgs) -> anyhow::Result<()> {
    let _lock = acquire_lock(args.lock.as_ref())?;
    let repos = TrackedRepos::load(&args.store.repo_list)?.snapshot();
    let store = CacheStore::open(&resolve_cache_path(&args.store)?);

    let stale: Vec<RepoId> = store
        .snapshot()
        .into_keys()
        .filter(|id| !repos.contains(id))
        .collect();
    if stale.is_empty() {
        println!("Nothing to prune.");
        return Ok(());
    }
    for id in &stale {
        println!("{} {id}", if args.dry_run { "Would remove" } else { "Removing" });
    }
    if args.dry_run {
        return Ok(());
    }
    let removed = store.retain_listed(&repos)?;
    info!(removed, path = %store.path().display(), "pruned cache");
    println!("Removed {removed} cache entries.");
    Ok(())
}
