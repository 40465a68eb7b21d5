use anyhow::Context;
use keyring::Entry;
use tracing::debug;

const SERVICE: &str = "release-mirror";
const ACCOUNT: &str = "github";

pub fn get_token() -> anyhow::Result<Option<String>> {
    let entry = Entry::new(SERVICE, ACCOUNT).context("open keyring entry")?;
    match entry.get_password() {
        Ok(token) => Ok(Some(token)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(err).context("read token from keyring"),
    }
}

pub fn set_token(token: &str) -> anyhow::Result<()> {
    let entry = Entry::new(SERVICE, ACCOUNT).context("open keyring entry")?;
    entry
        .set_password(token.trim())
        .context("write token to keyring")
}

pub fn clear_token() -> anyhow::Result<bool> {
    let entry = Entry::new(SERVICE, ACCOUNT).context("open keyring entry")?;
    match entry.delete_credential() {
        Ok(()) => Ok(true),
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(err) => Err(err).context("delete token from keyring"),
    }
}

pub fn resolve_token(explicit: Option<String>) -> Option<String> {
    if let Some(token) = explicit.filter(|token| !token.trim().is_empty()) {
        return Some(token);
    }
    match get_token() {
        Ok(token) => token,
        Err(err) => {
            debug!(error = %format!("{err:#}"), "no keyring token available");
            None
        }
    }
}
