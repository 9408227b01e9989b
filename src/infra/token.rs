//! Bearer-credential loading.
//!
//! The token file holds a single line produced by the out-of-band OAuth
//! flow; this module treats it as an opaque string. A missing or empty file
//! is fatal at startup.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Env var overriding the token file location (used by tests and embedders).
pub const TOKEN_FILE_ENV: &str = "SAVEGUARD_TOKEN_FILE";

/// Resolve the token file path.
///
/// # Errors
///
/// Returns an error if no local data directory can be determined.
pub fn token_path() -> Result<PathBuf> {
    if let Ok(val) = std::env::var(TOKEN_FILE_ENV) {
        return Ok(PathBuf::from(val));
    }
    let base = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("cannot determine local data directory"))?;
    Ok(base.join("saveguard").join("token.txt"))
}

/// Read the bearer token.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or empty.
pub fn load_token() -> Result<String> {
    let path = token_path()?;
    let content = std::fs::read_to_string(&path).with_context(|| {
        format!(
            "cannot read token file {} (complete the sign-in flow first)",
            path.display()
        )
    })?;
    let token = content.lines().next().unwrap_or("").trim();
    if token.is_empty() {
        bail!("token file {} is empty", path.display());
    }
    Ok(token.to_string())
}
