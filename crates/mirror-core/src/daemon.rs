use crate::sync_engine::SyncEngine;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Trigger {
    Startup,
    Refresh,
    Retry,
    Manual,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Startup => "startup",
            Trigger::Refresh => "refresh",
            Trigger::Retry => "retry",
            Trigger::Manual => "manual",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default)]
pub struct PassGuard {
    running: Arc<Mutex<()>>,
}

impl PassGuard {
    pub async fn run_exclusive<F, Fut, T>(&self, trigger: Trigger, job: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        match self.running.try_lock() {
            Ok(_running) => Some(job().await),
            Err(_) => {
                warn!(trigger = %trigger, "sync pass already running; skipping");
                None
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.try_lock().is_err()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TriggerSchedule {
    pub refresh: Duration,
    pub retry: Duration,
}

impl Default for TriggerSchedule {
    fn default() -> Self {
        Self {
            refresh: Duration::from_secs(3_600),
            retry: Duration::from_secs(300),
        }
    }
}

pub async fn run_triggers(engine: Arc<SyncEngine>, schedule: TriggerSchedule) {
    spawn_pass(&engine, Trigger::Startup);

    let start = Instant::now();
    let mut refresh = interval_at(start + schedule.refresh, schedule.refresh);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut retry = interval_at(start + schedule.retry, schedule.retry);
    retry.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        refresh_secs = schedule.refresh.as_secs(),
        retry_secs = schedule.retry.as_secs(),
        "sync triggers armed"
    );
    loop {
        tokio::select! {
            _ = refresh.tick() => spawn_pass(&engine, Trigger::Refresh),
            _ = retry.tick() => spawn_pass(&engine, Trigger::Retry),
        }
    }
}

fn spawn_pass(engine: &Arc<SyncEngine>, trigger: Trigger) {
    let engine = Arc::clone(engine);
    tokio::spawn(async move {
        engine.run_pass(trigger).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::config::SyncSettings;
    use crate::error::UpstreamError;
    use crate::model::{ReleaseInfo, RepoId, RepoMeta};
    use crate::provider::{UpstreamClient, UpstreamFuture};
    use crate::repo_list::TrackedRepos;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use tokio::sync::oneshot;

    #[derive(Default)]
    struct CountingUpstream {
        calls: AtomicUsize,
    }

    impl UpstreamClient for CountingUpstream {
        fn fetch_repo_info<'a>(
            &'a self,
            _owner: &'a str,
            _name: &'a str,
        ) -> UpstreamFuture<'a, RepoMeta> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok::<_, UpstreamError>(RepoMeta::default()) })
        }

        fn fetch_latest_release<'a>(
            &'a self,
            _owner: &'a str,
            _name: &'a str,
        ) -> UpstreamFuture<'a, ReleaseInfo> {
            Box::pin(async {
                Ok(ReleaseInfo {
                    tag: "v1".into(),
                    assets: Vec::new(),
                })
            })
        }
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn overlapping_pass_is_skipped() {
        let guard = PassGuard::default();
        let counter = Arc::new(AtomicUsize::new(0));
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let (started_tx, started_rx) = oneshot::channel::<()>();

        let first = {
            let guard = guard.clone();
            let counter = Arc::clone(&counter);
            tokio::spawn(async move {
                guard
                    .run_exclusive(Trigger::Refresh, || async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        let _ = started_tx.send(());
                        let _ = release_rx.await;
                    })
                    .await
            })
        };
        started_rx.await.unwrap();
        assert!(guard.is_running());

        let second = guard
            .run_exclusive(Trigger::Retry, || async {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        assert!(second.is_none());

        release_tx.send(()).unwrap();
        assert!(first.await.unwrap().is_some());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!guard.is_running());
    }

    #[tokio::test]
    async fn sequential_passes_both_run() {
        let guard = PassGuard::default();
        assert_eq!(guard.run_exclusive(Trigger::Manual, || async { 1 }).await, Some(1));
        assert_eq!(guard.run_exclusive(Trigger::Manual, || async { 2 }).await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn triggers_fire_on_startup_and_each_interval() {
        let tmp = TempDir::new().unwrap();
        let list = tmp.path().join("repos.txt");
        std::fs::write(&list, "a/b\n").unwrap();
        let upstream = Arc::new(CountingUpstream::default());
        let engine = Arc::new(SyncEngine::new(
            Arc::new(CacheStore::open(&tmp.path().join("cache.json"))),
            TrackedRepos::from_ids(&list, vec![RepoId::from("a/b")]),
            upstream.clone(),
            SyncSettings::default(),
        ));

        let schedule = TriggerSchedule {
            refresh: Duration::from_secs(3_650),
            retry: Duration::from_secs(300),
        };
        let triggers = tokio::spawn(run_triggers(engine, schedule));
        settle().await;
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(299)).await;
        settle().await;
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(3_350)).await;
        settle().await;
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1 + 12 + 1);

        triggers.abort();
    }
}
