use super::*;
use time::OffsetDateTime;

pub(super) struct Workspace {
    pub(super) _lock: CacheLock,
    pub(super) engine: Arc<SyncEngine>,
}

pub(super) fn resolve_cache_path(store: &StoreArgs) -> anyhow::Result<PathBuf> {
    match &store.cache {
        Some(path) => Ok(path.clone()),
        None => default_cache_path(),
    }
}

pub(super) fn resolve_lock_path(lock: Option<&PathBuf>) -> anyhow::Result<PathBuf> {
    match lock {
        Some(path) => Ok(path.clone()),
        None => default_lock_path(),
    }
}

pub(super) fn acquire_lock(lock: Option<&PathBuf>) -> anyhow::Result<CacheLock> {
    let lock_path = resolve_lock_path(lock)?;
    let lock = CacheLock::acquire(&lock_path)?;
    info!(path = %lock.path().display(), "cache lock acquired");
    Ok(lock)
}

pub(super) fn open_workspace(
    store: &StoreArgs,
    upstream: &UpstreamArgs,
) -> anyhow::Result<Workspace> {
    let lock = acquire_lock(upstream.lock.as_ref())?;
    let repos = TrackedRepos::load(&store.repo_list)?;
    info!(
        path = %store.repo_list.display(),
        repos = repos.snapshot().len(),
        "repository list loaded"
    );

    let cache_path = resolve_cache_path(store)?;
    let cache = Arc::new(CacheStore::open(&cache_path));
    info!(path = %cache_path.display(), entries = cache.snapshot().len(), "cache opened");

    let token = auth::resolve_token(upstream.token.clone());
    let client = GitHubClient::new(
        &upstream.github_api,
        token,
        Duration::from_secs(upstream.request_timeout_secs.max(1)),
    )?;
    if !client.is_authenticated() {
        warn!("no GitHub token configured; requests are subject to anonymous rate limits");
    }

    let engine = SyncEngine::new(cache, repos, Arc::new(client), upstream.sync_settings());
    Ok(Workspace {
        _lock: lock,
        engine: Arc::new(engine),
    })
}

pub(super) fn format_epoch(epoch: Option<u64>) -> String {
    let Some(epoch) = epoch else {
        return "-".to_string();
    };
    i64::try_from(epoch)
        .ok()
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        .map(logging::format_timestamp)
        .unwrap_or_else(|| epoch.to_string())
}

pub(super) fn print_summary(summary: &PassSummary) {
    println!(
        "Queued: {}  Synced: {}  Failed: {}  Skipped: {}",
        summary.queued, summary.synced, summary.failed, summary.skipped
    );
}
