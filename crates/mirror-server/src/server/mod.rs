use crate::logging::LogBuffer;
use anyhow::Context;
use mirror_core::cache::CacheStore;
use mirror_core::repo_list::TrackedRepos;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

mod handlers;
mod views;

use handlers::{
    detail_handler, download_handler, fallback_handler, health_handler, index_handler,
    logs_handler,
};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<CacheStore>,
    repos: TrackedRepos,
    mirror_base: String,
    max_retries: u32,
    logs: LogBuffer,
}

impl AppState {
    pub fn new(
        store: Arc<CacheStore>,
        repos: TrackedRepos,
        mirror_base: impl Into<String>,
        max_retries: u32,
        logs: LogBuffer,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                repos,
                mirror_base: mirror_base.into(),
                max_retries,
                logs,
            }),
        }
    }

    pub fn store(&self) -> &CacheStore {
        &self.inner.store
    }

    pub fn repos(&self) -> &TrackedRepos {
        &self.inner.repos
    }

    pub fn mirror_base(&self) -> &str {
        &self.inner.mirror_base
    }

    pub fn max_retries(&self) -> u32 {
        self.inner.max_retries
    }

    pub fn logs(&self) -> &LogBuffer {
        &self.inner.logs
    }
}

pub fn build_router(app_state: AppState) -> axum::Router {
    use axum::routing::get;

    axum::Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/-/logs", get(logs_handler))
        .route("/:owner/:repo", get(detail_handler))
        .route("/:owner/:repo/:filename", get(download_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn serve(app_state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    let local = listener.local_addr().context("read bound address")?;
    info!(addr = %local, "http surface listening");
    axum::serve(listener, build_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use mirror_core::cache::CachePatch;
    use mirror_core::model::{Asset, RepoId, SyncMeta};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const MIRROR: &str = "https://mirror.example/";

    fn test_app_state(tmp: &TempDir, repos: &[&str]) -> AppState {
        let store = Arc::new(CacheStore::open(&tmp.path().join("cache.json")));
        let tracked = TrackedRepos::from_ids(
            &tmp.path().join("repos.txt"),
            repos.iter().map(|id| RepoId::from(*id)).collect(),
        );
        AppState::new(store, tracked, MIRROR, 3, LogBuffer::new(10))
    }

    fn record_release(state: &AppState, id: &str, tag: &str, assets: &[&str]) {
        state
            .store()
            .upsert(
                &RepoId::from(id),
                CachePatch {
                    version: Some(tag.to_string()),
                    assets: Some(
                        assets
                            .iter()
                            .map(|name| Asset {
                                name: name.to_string(),
                                download_url: format!(
                                    "https://github.com/{id}/releases/download/{tag}/{name}"
                                ),
                            })
                            .collect(),
                    ),
                    updated_at: Some(1_000),
                    sync_meta: Some(SyncMeta {
                        attempts: 0,
                        next_retry: None,
                        last_success: Some(1_000),
                    }),
                    ..CachePatch::default()
                },
            )
            .unwrap();
    }

    async fn get(state: &AppState, uri: &str) -> axum::response::Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        build_router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn index_lists_synced_and_unsynced_repos() {
        let tmp = TempDir::new().unwrap();
        let state = test_app_state(&tmp, &["a/b", "never/seen"]);
        record_release(&state, "a/b", "2.0.0", &["x.zip", "y.zip"]);

        let response = get(&state, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let repos = body["repos"].as_array().unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0]["id"], "a/b");
        assert_eq!(repos[0]["status"], "ok");
        assert_eq!(repos[0]["version"], "2.0.0");
        assert_eq!(repos[0]["asset_count"], 2);
        assert_eq!(repos[1]["id"], "never/seen");
        assert_eq!(repos[1]["status"], "never_synced");
    }

    #[tokio::test]
    async fn failed_repo_still_listed_with_old_data() {
        let tmp = TempDir::new().unwrap();
        let state = test_app_state(&tmp, &["c/d"]);
        record_release(&state, "c/d", "v1", &["old.zip"]);
        state
            .store()
            .upsert(
                &RepoId::from("c/d"),
                CachePatch::failure(
                    2_000,
                    SyncMeta {
                        attempts: 3,
                        next_retry: Some(2_000 + 86_400),
                        last_success: Some(1_000),
                    },
                ),
            )
            .unwrap();

        let body = json_body(get(&state, "/").await).await;
        assert_eq!(body["repos"][0]["status"], "failed");
        assert_eq!(body["repos"][0]["version"], "v1");
        assert_eq!(body["repos"][0]["last_error"], 2_000);
    }

    #[tokio::test]
    async fn detail_lists_assets() {
        let tmp = TempDir::new().unwrap();
        let state = test_app_state(&tmp, &["a/b"]);
        record_release(&state, "a/b", "2.0.0", &["x.zip", "y.zip"]);

        let response = get(&state, "/a/b").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["version"], "2.0.0");
        let assets = body["assets"].as_array().unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0]["name"], "x.zip");
        assert_eq!(assets[1]["proxy_path"], "/a/b/y.zip");
    }

    #[tokio::test]
    async fn detail_without_entry_or_version_is_404() {
        let tmp = TempDir::new().unwrap();
        let state = test_app_state(&tmp, &["a/b", "c/d"]);
        state
            .store()
            .upsert(&RepoId::from("c/d"), CachePatch::failure(5, SyncMeta::default()))
            .unwrap();

        assert_eq!(get(&state, "/a/b").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(get(&state, "/c/d").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn download_redirects_through_mirror() {
        let tmp = TempDir::new().unwrap();
        let state = test_app_state(&tmp, &["owner/name"]);
        record_release(&state, "owner/name", "v1", &["file.zip"]);

        let response = get(&state, "/owner/name/file.zip").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response.headers().get(header::LOCATION).unwrap();
        assert_eq!(
            location.to_str().unwrap(),
            "https://mirror.example/https://github.com/owner/name/releases/download/v1/file.zip"
        );
    }

    #[tokio::test]
    async fn unknown_asset_or_repo_is_404() {
        let tmp = TempDir::new().unwrap();
        let state = test_app_state(&tmp, &["a/b"]);
        record_release(&state, "a/b", "2.0.0", &["x.zip", "y.zip"]);

        assert_eq!(
            get(&state, "/a/b/missing.zip").await.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get(&state, "/nobody/here/x.zip").await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn unmatched_route_is_404() {
        let tmp = TempDir::new().unwrap();
        let state = test_app_state(&tmp, &[]);
        let response = get(&state, "/a/b/c/d").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_returns_200() {
        let tmp = TempDir::new().unwrap();
        let state = test_app_state(&tmp, &[]);
        let response = get(&state, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn logs_endpoint_returns_buffered_lines() {
        let tmp = TempDir::new().unwrap();
        let state = test_app_state(&tmp, &[]);
        state.logs().push(crate::logging::LogEntry {
            timestamp: "2024-01-01T00:00:00Z".into(),
            level: tracing::Level::INFO,
            target: "mirror_core::sync_engine".into(),
            fields: vec![("message".into(), "sync pass finished".into())],
        });
        let response = get(&state, "/-/logs").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).contains("sync pass finished"));
    }

    #[tokio::test]
    async fn repository_named_like_service_path_is_reachable() {
        let tmp = TempDir::new().unwrap();
        let state = test_app_state(&tmp, &["api/logs"]);
        record_release(&state, "api/logs", "v9", &["tool.zip"]);

        let response = get(&state, "/api/logs").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], "api/logs");
        assert_eq!(body["version"], "v9");

        let response = get(&state, "/api/logs/tool.zip").await;
        assert_eq!(response.status(), StatusCode::FOUND);
    }
}
