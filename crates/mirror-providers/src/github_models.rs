use mirror_core::model::{Asset, ReleaseInfo, RepoMeta};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
pub(crate) struct RepoItem {
    #[serde(default)]
    pub(crate) stargazers_count: Option<u64>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) language: Option<String>,
    #[serde(default)]
    pub(crate) pushed_at: Option<String>,
}

impl From<RepoItem> for RepoMeta {
    fn from(item: RepoItem) -> Self {
        RepoMeta {
            stars: item.stargazers_count,
            description: item.description,
            language: item.language,
            last_commit: item.pushed_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReleaseItem {
    pub(crate) tag_name: String,
    #[serde(default)]
    pub(crate) assets: Vec<ReleaseAssetItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReleaseAssetItem {
    pub(crate) name: String,
    pub(crate) browser_download_url: String,
}

impl From<ReleaseItem> for ReleaseInfo {
    fn from(item: ReleaseItem) -> Self {
        let mut seen = HashSet::new();
        let assets = item
            .assets
            .into_iter()
            .filter(|asset| seen.insert(asset.name.clone()))
            .map(|asset| Asset {
                name: asset.name,
                download_url: asset.browser_download_url,
            })
            .collect();
        ReleaseInfo {
            tag: item.tag_name,
            assets,
        }
    }
}
