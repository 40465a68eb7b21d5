use crate::cache::{CachePatch, CacheStore};
use crate::config::SyncSettings;
use crate::daemon::{PassGuard, Trigger};
use crate::error::UpstreamError;
use crate::model::{ReleaseInfo, RepoId, RepoMeta};
use crate::provider::UpstreamClient;
use crate::repo_list::TrackedRepos;
use crate::scheduler::build_queue;
use anyhow::Context;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info, warn};

pub fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RepoOutcome {
    Skipped { until: u64 },
    Invalid,
    Synced { version: String, was_retry: bool },
    Failed {
        attempts: u32,
        next_retry: u64,
        was_retry: bool,
    },
}

impl RepoOutcome {
    fn attempted(&self) -> Option<bool> {
        match self {
            RepoOutcome::Synced { was_retry, .. } | RepoOutcome::Failed { was_retry, .. } => {
                Some(*was_retry)
            }
            RepoOutcome::Skipped { .. } | RepoOutcome::Invalid => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub queued: usize,
    pub synced: u32,
    pub failed: u32,
    pub skipped: u32,
}

impl PassSummary {
    fn record(&mut self, outcome: &RepoOutcome) {
        match outcome {
            RepoOutcome::Synced { .. } => self.synced += 1,
            RepoOutcome::Failed { .. } => self.failed += 1,
            RepoOutcome::Skipped { .. } | RepoOutcome::Invalid => self.skipped += 1,
        }
    }
}

pub struct SyncEngine {
    store: Arc<CacheStore>,
    repos: TrackedRepos,
    client: Arc<dyn UpstreamClient>,
    settings: SyncSettings,
    guard: PassGuard,
}

impl SyncEngine {
    pub fn new(
        store: Arc<CacheStore>,
        repos: TrackedRepos,
        client: Arc<dyn UpstreamClient>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            store,
            repos,
            client,
            settings,
            guard: PassGuard::default(),
        }
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    pub fn repos(&self) -> &TrackedRepos {
        &self.repos
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub async fn run_pass(&self, trigger: Trigger) -> Option<PassSummary> {
        self.guard
            .run_exclusive(trigger, move || async move {
                let repos = match self.repos.reload() {
                    Ok(repos) => repos,
                    Err(err) => {
                        warn!(error = %err, "repository list unreadable; reusing previous list");
                        self.repos.snapshot()
                    }
                };
                let queue = build_queue(&repos, &self.store.snapshot(), now_epoch_seconds());
                info!(trigger = %trigger, queued = queue.len(), "sync pass starting");
                let summary = self.run_queue(queue).await;
                info!(
                    trigger = %trigger,
                    synced = summary.synced,
                    failed = summary.failed,
                    skipped = summary.skipped,
                    "sync pass finished"
                );
                summary
            })
            .await
    }

    pub async fn run_queue(&self, queue: Vec<RepoId>) -> PassSummary {
        let mut summary = PassSummary {
            queued: queue.len(),
            ..PassSummary::default()
        };
        let total = queue.len();
        for (index, id) in queue.iter().enumerate() {
            let had_failed = self
                .store
                .get(id)
                .is_some_and(|entry| entry.sync_meta.attempts > 0);
            let attempted = match self.sync_repo(id, now_epoch_seconds()).await {
                Ok(outcome) => {
                    summary.record(&outcome);
                    outcome.attempted()
                }
                Err(err) => {
                    error!(repo = %id, error = ?err, "failed to record sync result");
                    summary.failed += 1;
                    Some(had_failed)
                }
            };
            if let Some(was_retry) = attempted
                && index + 1 < total
            {
                tokio::time::sleep(self.settings.delay_after(was_retry)).await;
            }
        }
        summary
    }

    pub async fn sync_repo(&self, id: &RepoId, now: u64) -> anyhow::Result<RepoOutcome> {
        let previous = self.store.get(id).unwrap_or_default();
        if previous.sync_meta.in_cooldown(now) {
            let until = previous.sync_meta.next_retry.unwrap_or(now);
            debug!(repo = %id, next_retry = until, "in cooldown; skipping");
            return Ok(RepoOutcome::Skipped { until });
        }
        let Some((owner, name)) = id.split() else {
            debug!(repo = %id, "not an owner/name identifier; skipping");
            return Ok(RepoOutcome::Invalid);
        };
        let was_retry = previous.sync_meta.attempts > 0;
        let policy = self.settings.retry;

        match self.fetch(owner, name).await {
            Ok((meta, release)) => {
                let version = release.tag.clone();
                let patch = CachePatch::success(now, meta, release, policy.record_success(now));
                self.persist(id, patch).await?;
                info!(repo = %id, version = %version, was_retry, "synced");
                Ok(RepoOutcome::Synced { version, was_retry })
            }
            Err(err) => {
                let sync_meta = policy.record_failure(&previous.sync_meta, now);
                let attempts = sync_meta.attempts;
                let next_retry = sync_meta.next_retry.unwrap_or(now);
                if let UpstreamError::RateLimited {
                    reset_at: Some(reset_at),
                } = &err
                {
                    debug!(repo = %id, reset_at, "upstream rate limit resets later");
                }
                if policy.exhausted(attempts) {
                    warn!(
                        repo = %id,
                        reason = err.kind(),
                        error = %err,
                        attempts,
                        next_retry,
                        "sync failed; retries exhausted, pausing"
                    );
                } else {
                    warn!(
                        repo = %id,
                        reason = err.kind(),
                        error = %err,
                        attempts,
                        next_retry,
                        "sync failed; backing off"
                    );
                }
                self.persist(id, CachePatch::failure(now, sync_meta)).await?;
                Ok(RepoOutcome::Failed {
                    attempts,
                    next_retry,
                    was_retry,
                })
            }
        }
    }

    async fn persist(&self, id: &RepoId, patch: CachePatch) -> anyhow::Result<()> {
        let store = Arc::clone(&self.store);
        let id = id.clone();
        tokio::task::spawn_blocking(move || store.upsert(&id, patch))
            .await
            .context("cache writer task")??;
        Ok(())
    }

    async fn fetch(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<(RepoMeta, ReleaseInfo), UpstreamError> {
        let meta = self.client.fetch_repo_info(owner, name).await?;
        let release = self.client.fetch_latest_release(owner, name).await?;
        Ok((meta, release))
    }
}
