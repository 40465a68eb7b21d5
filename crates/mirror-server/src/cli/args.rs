use super::*;
#[derive(Parser)]
#[command(author, version, about = "Mirror GitHub release metadata and redirect downloads")]
pub(super) struct Cli {
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(clap::Subcommand)]
pub(super) enum Commands {
    #[command(about = "Run the sync worker and the HTTP surface")]
    Serve(ServeArgs),
    #[command(about = "Run a single sync pass and exit")]
    Sync(SyncArgs),
    #[command(about = "Show cached status for every tracked repository")]
    Status(StatusArgs),
    #[command(about = "Drop cache entries for repositories no longer listed")]
    Prune(PruneArgs),
    #[command(about = "Manage the stored GitHub token")]
    Token(TokenArgs),
}

#[derive(clap::Args, Clone, Debug)]
pub(super) struct StoreArgs {
    #[arg(long, env = "REPO_LIST", default_value = "repos.txt")]
    pub(super) repo_list: PathBuf,
    #[arg(long, env = "CACHE_FILE")]
    pub(super) cache: Option<PathBuf>,
}

#[derive(clap::Args, Clone, Debug)]
pub(super) struct UpstreamArgs {
    #[arg(long, env = "LOCK_FILE")]
    pub(super) lock: Option<PathBuf>,
    #[arg(long, env = "RETRY_DELAY", default_value_t = 300)]
    pub(super) retry_delay_secs: u64,
    #[arg(long, env = "MAX_RETRIES", default_value_t = 5)]
    pub(super) max_retries: u32,
    #[arg(long, env = "RETRY_PAUSE", default_value_t = 86_400)]
    pub(super) retry_pause_secs: u64,
    #[arg(long, env = "ITEM_DELAY_MS", default_value_t = 2_000)]
    pub(super) item_delay_ms: u64,
    #[arg(long, env = "RETRY_ITEM_DELAY_MS", default_value_t = 5_000)]
    pub(super) retry_item_delay_ms: u64,
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 30)]
    pub(super) request_timeout_secs: u64,
    #[arg(long, env = "GITHUB_API", default_value = DEFAULT_API_BASE)]
    pub(super) github_api: String,
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub(super) token: Option<String>,
}

impl UpstreamArgs {
    pub(super) fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            retry: RetryPolicy {
                base_delay_secs: self.retry_delay_secs,
                max_retries: self.max_retries,
                pause_secs: self.retry_pause_secs,
            },
            item_delay: Duration::from_millis(self.item_delay_ms),
            retry_item_delay: Duration::from_millis(self.retry_item_delay_ms),
        }
    }
}

#[derive(Parser)]
pub(super) struct ServeArgs {
    #[command(flatten)]
    pub(super) store: StoreArgs,
    #[command(flatten)]
    pub(super) upstream: UpstreamArgs,
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub(super) port: u16,
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub(super) bind: IpAddr,
    #[arg(
        long,
        env = "MIRROR_BASE",
        default_value = "",
        help = "Prefix prepended verbatim to asset URLs on redirect"
    )]
    pub(super) mirror_base: String,
    #[arg(long, env = "REFRESH_INTERVAL", default_value_t = 3_600)]
    pub(super) refresh_interval_secs: u64,
    #[arg(long, env = "RETRY_INTERVAL", default_value_t = 300)]
    pub(super) retry_interval_secs: u64,
}

impl ServeArgs {
    pub(super) fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub(super) fn schedule(&self) -> TriggerSchedule {
        TriggerSchedule {
            refresh: Duration::from_secs(self.refresh_interval_secs.max(1)),
            retry: Duration::from_secs(self.retry_interval_secs.max(1)),
        }
    }
}

#[derive(Parser)]
pub(super) struct SyncArgs {
    #[command(flatten)]
    pub(super) store: StoreArgs,
    #[command(flatten)]
    pub(super) upstream: UpstreamArgs,
}

#[derive(Parser)]
pub(super) struct StatusArgs {
    #[command(flatten)]
    pub(super) store: StoreArgs,
    #[arg(long, env = "MAX_RETRIES", default_value_t = 5)]
    pub(super) max_retries: u32,
}

#[derive(Parser)]
pub(super) struct PruneArgs {
    #[command(flatten)]
    pub(super) store: StoreArgs,
    #[arg(long, env = "LOCK_FILE")]
    pub(super) lock: Option<PathBuf>,
    #[arg(long, help = "Show what would be removed without writing")]
    pub(super) dry_run: bool,
}

#[derive(Parser)]
pub(super) struct TokenArgs {
    #[command(subcommand)]
    pub(super) command: TokenCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum TokenCommands {
    #[command(about = "Store a GitHub token in the OS keyring")]
    Set(SetTokenArgs),
    #[command(about = "Remove the stored GitHub token")]
    Clear,
}

#[derive(Parser)]
pub(super) struct SetTokenArgs {
    #[arg(long)]
    pub(super) token: String,
}
