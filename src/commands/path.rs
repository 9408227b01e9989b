//! `saveguard path <name>` — show an application's save path.

use anyhow::Result;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::domain::{NotConfigured, expand_placeholders};

/// Run `saveguard path`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the name is
/// not configured.
pub async fn run(app: &AppContext, name: &str) -> Result<ExitCode> {
    let registry = app.load_registry().await?;
    let entry = registry
        .find(name)
        .ok_or_else(|| NotConfigured(name.to_string()))?;

    let expanded = expand_placeholders(&entry.save_path);
    app.output.info(&format!("{name}: {}", entry.save_path));
    if expanded != entry.save_path {
        app.output.info(&format!("expands to: {expanded}"));
    }

    Ok(ExitCode::SUCCESS)
}
