use super::*;
pub async fn run() -> anyhow::Result<()> {
    let log_buffer = logging::LogBuffer::default();
    logging::init(log_buffer.clone());

    let cli = Cli::parse();
    info!(command = command_label(&cli.command), "Running command");

    match cli.command {
        Commands::Serve(args) => handle_serve(args, log_buffer).await,
        Commands::Sync(args) => handle_sync(args).await,
        Commands::Status(args) => handle_status(args),
        Commands::Prune(args) => handle_prune(args),
        Commands::Token(args) => handle_token(args),
    }
}

pub(super) fn command_label(command: &Commands) -> &'static str {
    match command {
        Commands::Serve(_) => "serve",
        Commands::Sync(_) => "sync",
        Commands::Status(_) => "status",
        Commands::Prune(_) => "prune",
        Commands::Token(_) => "token",
    }
}
