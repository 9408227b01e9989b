//! Port trait definitions for the application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::future::Future;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::domain::{ArchiveError, TransportError};

// ── Remote object store ───────────────────────────────────────────────────────

/// Named blob upload/download against the remote store.
///
/// Returned futures are `Send` because pipelines run as spawned tasks.
pub trait ObjectStore: Send + Sync {
    /// Fetch the object at `key`.
    fn download(&self, key: &str) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;

    /// Upload `bytes` to `key` with overwrite (last-write-wins) semantics.
    fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

// ── Directory archiving ───────────────────────────────────────────────────────

/// Directory tree ⇄ compressed in-memory bundle.
///
/// Compression is CPU-bound; implementations run it off the calling
/// execution context (the watch loop and any GUI event loop stay live).
pub trait Archiver: Send + Sync {
    /// Walk `root` and produce a single bundle preserving relative paths.
    /// Never yields partial output.
    fn pack(&self, root: &Path) -> impl Future<Output = Result<Vec<u8>, ArchiveError>> + Send;

    /// Expand a bundle into `dest`, creating it if absent and overwriting
    /// files at the same relative paths.
    fn unpack(
        &self,
        bytes: Vec<u8>,
        dest: &Path,
    ) -> impl Future<Output = Result<(), ArchiveError>> + Send;
}

// ── OS process enumeration ────────────────────────────────────────────────────

/// A specific OS process instance.
///
/// Identity is `pid` together with `started_at`, so a recycled PID from a
/// later run is never conflated with the instance being tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningProcess {
    pub pid: u32,
    pub started_at: u64,
    pub name: String,
}

/// Snapshot-and-poll view of the OS process table.
pub trait ProcessProbe: Send {
    /// Enumerate currently running processes.
    fn snapshot(&mut self) -> Vec<RunningProcess>;

    /// Whether this exact process instance is still alive.
    fn is_alive(&mut self, process: &RunningProcess) -> bool;
}

// ── Log stream ────────────────────────────────────────────────────────────────

/// Severity of a [`LogRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warn,
    Error,
}

/// One human-readable status line emitted by a pipeline step.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub at: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl LogRecord {
    #[must_use]
    pub fn new(level: LogLevel, message: &str) -> Self {
        Self {
            at: Local::now(),
            level,
            message: message.to_string(),
        }
    }
}

/// Append-only sink for pipeline status lines.
///
/// Services own an `Arc<dyn EventSink>` with a lifetime tied to the
/// orchestrator instance; there is no process-global logger. A GUI
/// collaborator observes progress by subscribing to a stream-backed
/// implementation, the CLI prints through a terminal-backed one.
pub trait EventSink: Send + Sync {
    fn emit(&self, record: LogRecord);

    fn info(&self, message: &str) {
        self.emit(LogRecord::new(LogLevel::Info, message));
    }

    fn success(&self, message: &str) {
        self.emit(LogRecord::new(LogLevel::Success, message));
    }

    fn warn(&self, message: &str) {
        self.emit(LogRecord::new(LogLevel::Warn, message));
    }

    fn error(&self, message: &str) {
        self.emit(LogRecord::new(LogLevel::Error, message));
    }
}
