use mirror_core::model::{CacheEntry, RepoId, RepoMeta, RepoStatus};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ListingView {
    pub repos: Vec<ListingRow>,
}

#[derive(Debug, Serialize)]
pub struct ListingRow {
    pub id: String,
    pub status: RepoStatus,
    pub version: Option<String>,
    pub stars: Option<u64>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub last_commit: Option<String>,
    pub updated_at: Option<u64>,
    pub last_error: Option<u64>,
    pub last_success: Option<u64>,
    pub next_retry: Option<u64>,
    pub asset_count: usize,
}

impl ListingRow {
    pub fn new(id: &RepoId, entry: Option<&CacheEntry>, max_retries: u32) -> Self {
        let status = RepoStatus::of(entry, max_retries);
        let Some(entry) = entry else {
            return Self {
                id: id.to_string(),
                status,
                version: None,
                stars: None,
                description: None,
                language: None,
                last_commit: None,
                updated_at: None,
                last_error: None,
                last_success: None,
                next_retry: None,
                asset_count: 0,
            };
        };
        Self {
            id: id.to_string(),
            status,
            version: entry.version.clone(),
            stars: entry.meta.stars,
            description: entry.meta.description.clone(),
            language: entry.meta.language.clone(),
            last_commit: entry.meta.last_commit.clone(),
            updated_at: entry.updated_at,
            last_error: entry.last_error,
            last_success: entry.sync_meta.last_success,
            next_retry: entry.sync_meta.next_retry,
            asset_count: entry.assets.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetailView {
    pub id: String,
    pub version: String,
    pub status: RepoStatus,
    pub meta: RepoMeta,
    pub updated_at: Option<u64>,
    pub last_error: Option<u64>,
    pub assets: Vec<AssetLink>,
}

#[derive(Debug, Serialize)]
pub struct AssetLink {
    pub name: String,
    pub download_url: String,
    pub proxy_path: String,
}

impl DetailView {
    pub fn new(id: &RepoId, entry: &CacheEntry, max_retries: u32) -> Option<Self> {
        let version = entry.version.clone()?;
        let assets = entry
            .assets
            .iter()
            .map(|asset| AssetLink {
                name: asset.name.clone(),
                download_url: asset.download_url.clone(),
                proxy_path: format!("/{id}/{}", asset.name),
            })
            .collect();
        Some(Self {
            id: id.to_string(),
            version,
            status: entry.status(max_retries),
            meta: entry.meta.clone(),
            updated_at: entry.updated_at,
            last_error: entry.last_error,
            assets,
        })
    }
}

pub fn mirror_url(mirror_base: &str, download_url: &str) -> String {
    format!("{mirror_base}{download_url}")
}
