use super::*;
pub(super) async fn handle_serve(args: ServeArgs, logs: logging::LogBuffer) -> anyhow::Result<()> {
    validate_mirror_base(&args.mirror_base)?;
    let workspace = open_workspace(&args.store, &args.upstream)?;
    let engine = Arc::clone(&workspace.engine);

    if args.mirror_base.is_empty() {
        warn!("MIRROR_BASE is empty; downloads redirect straight to upstream");
    }

    let triggers = tokio::spawn(run_triggers(Arc::clone(&engine), args.schedule()));

    let state = server::AppState::new(
        Arc::clone(engine.store()),
        engine.repos().clone(),
        args.mirror_base.clone(),
        engine.settings().retry.max_retries,
        logs,
    );
    let result = server::serve(state, args.addr()).await;
    triggers.abort();
    drop(workspace);
    result
}
