//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::net`. All error types
//! implement `thiserror::Error` and convert to `anyhow::Error` via the `?`
//! operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Configuration errors ──────────────────────────────────────────────────────

/// Errors raised while materializing the remote configuration document.
///
/// Any of these is fatal at startup: no pipeline can run without a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot fetch configuration document: {0}")]
    Fetch(#[source] TransportError),

    #[error("configuration document is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("'{0}' does not name an executable image (expected a name ending in .exe)")]
    InvalidName(String),
}

/// Remote write of the configuration document failed.
///
/// The in-memory registry is rolled back to its pre-call state; the process
/// keeps running.
#[derive(Debug, Error)]
#[error("configuration update was not persisted, change discarded: {0}")]
pub struct PersistError(#[source] pub TransportError);

// ── Transport errors ──────────────────────────────────────────────────────────

/// Errors surfaced by the remote object store.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("remote store rejected the credential (check the token file)")]
    Unauthorized,

    #[error("no remote object at '{0}'")]
    NotFound(String),

    #[error("remote store unreachable: {0}")]
    Network(String),
}

// ── Archive errors ────────────────────────────────────────────────────────────

/// Errors raised while packing or unpacking a save-data bundle.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("save directory '{0}' does not exist or is not a directory")]
    MissingRoot(PathBuf),

    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bundle is corrupt: {0}")]
    Corrupt(String),

    #[error("archive worker failed: {0}")]
    Worker(String),
}

// ── Registry lookup ───────────────────────────────────────────────────────────

/// The named application is absent from the registry.
#[derive(Debug, Error)]
#[error("'{0}' is not configured. Add it first: saveguard add {0} <save-path>")]
pub struct NotConfigured(pub String);
