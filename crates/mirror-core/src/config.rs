use crate::cache::RetryPolicy;
use crate::error::ConfigError;
use anyhow::Context;
use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct SyncSettings {
    pub retry: RetryPolicy,
    pub item_delay: Duration,
    pub retry_item_delay: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            item_delay: Duration::from_millis(2_000),
            retry_item_delay: Duration::from_millis(5_000),
        }
    }
}

impl SyncSettings {
    pub fn delay_after(&self, was_retry: bool) -> Duration {
        if was_retry {
            self.retry_item_delay
        } else {
            self.item_delay
        }
    }
}

pub fn validate_mirror_base(mirror_base: &str) -> Result<(), ConfigError> {
    if mirror_base.is_empty() {
        return Ok(());
    }
    let scheme_ok = mirror_base.starts_with("https://") || mirror_base.starts_with("http://");
    let has_host = mirror_base
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());
    if !scheme_ok || !has_host || mirror_base.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidMirrorBase(mirror_base.to_string()));
    }
    Ok(())
}

fn project_dirs() -> anyhow::Result<ProjectDirs> {
    ProjectDirs::from("com", "release-mirror", "release-mirror").context("resolve project dirs")
}

pub fn default_cache_path() -> anyhow::Result<PathBuf> {
    Ok(project_dirs()?.cache_dir().join("cache.json"))
}

pub fn default_lock_path() -> anyhow::Result<PathBuf> {
    let project = project_dirs()?;
    Ok(project
        .runtime_dir()
        .unwrap_or(project.cache_dir())
        .join("mirror.lock"))
}
