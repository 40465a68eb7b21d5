use crate::{logging, server};
use anyhow::Context;
use clap::Parser;
use mirror_core::cache::{CacheStore, RetryPolicy};
use mirror_core::config::{
    SyncSettings, default_cache_path, default_lock_path, validate_mirror_base,
};
use mirror_core::daemon::{Trigger, TriggerSchedule, run_triggers};
use mirror_core::lockfile::CacheLock;
use mirror_core::model::RepoStatus;
use mirror_core::repo_list::TrackedRepos;
use mirror_core::sync_engine::{PassSummary, SyncEngine};
use mirror_providers::auth;
use mirror_providers::{DEFAULT_API_BASE, GitHubClient};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod app;
mod args;
mod cache_cmd;
mod serve_cmd;
mod shared;
mod sync_cmd;
mod token_cmd;

use args::*;

use cache_cmd::{handle_prune, handle_status};
use serve_cmd::handle_serve;
use shared::{format_epoch, open_workspace};
use sync_cmd::handle_sync;
use token_cmd::handle_token;

pub async fn run() -> anyhow::Result<()> {
    app::run().await
}
