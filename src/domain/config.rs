//! Domain types for the application→save-path registry.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Well-known object key of the configuration document.
pub const CONFIG_KEY: &str = "configs.json";

/// Sub-prefix under which per-application archives live.
pub const ARCHIVE_PREFIX: &str = "data";

// ── Config schema ────────────────────────────────────────────────────────────

/// One watched application: process image name plus its save-data directory.
///
/// `save_path` may contain environment-variable placeholders (`%APPDATA%`,
/// `${HOME}`); they are expanded at use time, not at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppEntry {
    pub name: String,
    pub save_path: String,
    /// Per-entry keys this tool does not interpret, preserved verbatim
    /// across a read-modify-write of the document.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The whole remote configuration document.
///
/// The document is rewritten wholesale on every mutation, so top-level keys
/// other than `applications` are carried through rather than interpreted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub applications: Vec<AppEntry>,
    /// Top-level keys this tool does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Entry with the given image name, if configured.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&AppEntry> {
        self.applications.iter().find(|e| e.name == name)
    }

    /// All configured image names, in display order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.applications.iter().map(|e| e.name.clone()).collect()
    }

    /// Restore the deterministic display order: case-insensitive by name.
    pub fn sort(&mut self) {
        self.applications
            .sort_by_key(|e| e.name.to_lowercase());
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates that `name` follows the executable image naming convention.
///
/// # Errors
///
/// Returns `ConfigError::InvalidName` if the name does not end in `.exe`
/// (case-insensitive) or has an empty stem.
pub fn validate_image_name(name: &str) -> Result<(), ConfigError> {
    let lower = name.to_lowercase();
    match lower.strip_suffix(".exe") {
        Some(stem) if !stem.is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidName(name.to_string())),
    }
}

// ── Object keys ──────────────────────────────────────────────────────────────

/// Remote key of the archive for `name`: `data/<stem>.zip`.
///
/// The stem is the image name minus its final extension, so `game.exe`
/// maps to `data/game.zip`.
#[must_use]
pub fn archive_key(name: &str) -> String {
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    format!("{ARCHIVE_PREFIX}/{stem}.zip")
}

// ── Placeholder expansion ────────────────────────────────────────────────────

/// Expands `%NAME%` and `${NAME}` environment placeholders in a save path.
///
/// Placeholders referring to unset variables are left untouched so the
/// failure surfaces later as a missing directory with the literal text
/// still visible in the message.
#[must_use]
pub fn expand_placeholders(path: &str) -> String {
    expand_with(path, |var| std::env::var(var).ok())
}

/// Same as [`expand_placeholders`], with an injected variable resolver.
/// Exists so tests never have to mutate the process environment.
#[must_use]
pub fn expand_with(path: &str, resolve: impl Fn(&str) -> Option<String>) -> String {
    let lookup = |var: &str| if var.is_empty() { None } else { resolve(var) };
    let mut out = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(start) = rest.find(['%', '$']) {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let (replacement, consumed) = match tail.as_bytes()[0] {
            b'%' => match tail[1..].find('%') {
                Some(end) => (lookup(&tail[1..=end]), end + 2),
                None => (None, 0),
            },
            _ if tail.starts_with("${") => match tail.find('}') {
                Some(end) => (lookup(&tail[2..end]), end + 1),
                None => (None, 0),
            },
            _ => (None, 0),
        };

        match (replacement, consumed) {
            (Some(value), n) => {
                out.push_str(&value);
                rest = &tail[n..];
            }
            (None, n) if n > 0 => {
                // Known syntax, unset variable: keep the placeholder verbatim.
                out.push_str(&tail[..n]);
                rest = &tail[n..];
            }
            _ => {
                // Lone `%` or `$` with no closing delimiter.
                out.push_str(&tail[..1]);
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

// ── Unit tests ───────────────────────────────────────────────────────────────
