use super::shared::print_summary;
use super::*;
pub(super) async fn handle_sync(args: SyncArgs) -> anyhow::Result<()> {
    let workspace = open_workspace(&args.store, &args.upstream)?;
    let summary = workspace
        .engine
        .run_pass(Trigger::Manual)
        .await
        .context("sync pass did not run")?;
    print_summary(&summary);
    Ok(())
}
