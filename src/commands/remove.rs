//! `saveguard remove <name>` — drop an application from the configuration.

use anyhow::Result;
use std::process::ExitCode;

use crate::app::AppContext;

/// Run `saveguard remove`. Removing a name that is not configured succeeds
/// and changes nothing.
///
/// # Errors
///
/// Returns an error when the updated configuration document cannot be
/// persisted (the change is discarded).
pub async fn run(app: &AppContext, name: &str) -> Result<ExitCode> {
    let mut registry = app.load_registry().await?;
    registry
        .remove(app.store.as_ref(), app.sink.as_ref(), name)
        .await?;
    Ok(ExitCode::SUCCESS)
}
