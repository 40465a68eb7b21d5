use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use mirror_core::model::RepoId;
use thiserror::Error;
use tracing::debug;

use super::AppState;
use super::views::{DetailView, ListingRow, ListingView, mirror_url};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("repository not mirrored: {0}")]
    RepoNotFound(RepoId),

    #[error("no release recorded for {0}")]
    NoRelease(RepoId),

    #[error("asset {asset} not found in {repo}")]
    AssetNotFound { repo: RepoId, asset: String },

    #[error("not found")]
    RouteNotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, self.to_string()).into_response()
    }
}

fn repo_id(owner: &str, repo: &str) -> RepoId {
    RepoId::new(format!("{owner}/{repo}"))
}

pub async fn index_handler(State(state): State<AppState>) -> Json<ListingView> {
    let cache = state.store().snapshot();
    let repos = state
        .repos()
        .snapshot()
        .iter()
        .map(|id| ListingRow::new(id, cache.get(id), state.max_retries()))
        .collect();
    Json(ListingView { repos })
}

pub async fn detail_handler(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> Result<Json<DetailView>, ApiError> {
    let id = repo_id(&owner, &repo);
    let entry = state
        .store()
        .get(&id)
        .ok_or_else(|| ApiError::RepoNotFound(id.clone()))?;
    DetailView::new(&id, &entry, state.max_retries())
        .map(Json)
        .ok_or(ApiError::NoRelease(id))
}

pub async fn download_handler(
    State(state): State<AppState>,
    Path((owner, repo, filename)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let id = repo_id(&owner, &repo);
    let entry = state
        .store()
        .get(&id)
        .ok_or_else(|| ApiError::RepoNotFound(id.clone()))?;
    let asset = entry.asset(&filename).ok_or_else(|| ApiError::AssetNotFound {
        repo: id.clone(),
        asset: filename.clone(),
    })?;
    let target = mirror_url(state.mirror_base(), &asset.download_url);
    debug!(repo = %id, asset = %filename, target = %target, "redirecting download");
    Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response())
}

pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

pub async fn logs_handler(State(state): State<AppState>) -> String {
    let mut out = String::new();
    for entry in state.logs().entries() {
        out.push_str(&entry.format_compact());
        out.push('\n');
    }
    out
}

pub async fn fallback_handler() -> ApiError {
    ApiError::RouteNotFound
}
