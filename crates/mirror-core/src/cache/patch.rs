use crate::model::{CacheEntry, RepoMeta, ReleaseInfo, SyncMeta};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CachePatch {
    pub version: Option<String>,
    pub assets: Option<Vec<crate::model::Asset>>,
    pub updated_at: Option<u64>,
    pub meta: Option<RepoMeta>,
    pub last_error: Option<u64>,
    pub sync_meta: Option<SyncMeta>,
}

impl CachePatch {
    pub fn success(now: u64, meta: RepoMeta, release: ReleaseInfo, sync_meta: SyncMeta) -> Self {
        Self {
            version: Some(release.tag),
            assets: Some(release.assets),
            updated_at: Some(now),
            meta: Some(meta),
            last_error: None,
            sync_meta: Some(sync_meta),
        }
    }

    pub fn failure(now: u64, sync_meta: SyncMeta) -> Self {
        Self {
            last_error: Some(now),
            sync_meta: Some(sync_meta),
            ..Self::default()
        }
    }

    pub fn apply(self, entry: &mut CacheEntry) {
        if let Some(version) = self.version {
            entry.version = Some(version);
        }
        if let Some(assets) = self.assets {
            entry.assets = assets;
        }
        if let Some(updated_at) = self.updated_at {
            entry.updated_at = Some(updated_at);
        }
        if let Some(meta) = self.meta {
            entry.meta = meta;
        }
        if let Some(last_error) = self.last_error {
            entry.last_error = Some(last_error);
        }
        if let Some(sync_meta) = self.sync_meta {
            entry.sync_meta = sync_meta;
        }
    }
}
