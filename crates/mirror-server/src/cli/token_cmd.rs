use super::*;
pub(super) fn handle_token(args: TokenArgs) -> anyhow::Result<()> {
    match args.command {
        TokenCommands::Set(args) => handle_set_token(args),
        TokenCommands::Clear => handle_clear_token(),
    }
}

fn handle_set_token(args: SetTokenArgs) -> anyhow::Result<()> {
    if args.token.trim().is_empty() {
        anyhow::bail!("token must not be empty");
    }
    auth::set_token(&args.token)?;
    auth::get_token()
        .context("read token from keyring after write")?
        .context("token missing from keyring after write")?;
    println!("Token stored in the OS keyring.");
    Ok(())
}

fn handle_clear_token() -> anyhow::Result<()> {
    if auth::clear_token()? {
        println!("Token removed.");
    } else {
        println!("No token was stored.");
    }
    Ok(())
}
