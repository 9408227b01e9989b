//! Application context — unified state passed to every command handler.
//!
//! Constructed once in `Cli::run()`. Adding a new cross-cutting concern
//! (another sink, a different store) requires only one field change here —
//! zero command signatures change.

use std::sync::Arc;

use anyhow::Result;

use crate::application::ports::EventSink;
use crate::application::services::pipeline::SavePipeline;
use crate::application::services::registry::SaveRegistry;
use crate::infra::archive::ZipArchiver;
use crate::infra::dropbox::DropboxStore;
use crate::infra::token;
use crate::output::{OutputContext, TerminalSink};

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Suppress non-error output.
    pub quiet: bool,
    /// Disable ANSI color output.
    pub no_color: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Remote object store holding the config document and the archives.
    pub store: Arc<DropboxStore>,
    /// Zip archiver.
    pub archiver: Arc<ZipArchiver>,
    /// Status line sink handed to every service.
    pub sink: Arc<dyn EventSink>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential file is missing or empty — nothing
    /// works without it.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let token = token::load_token()?;
        let output = OutputContext::new(flags.no_color, flags.quiet);
        let sink: Arc<dyn EventSink> = Arc::new(TerminalSink::new(output.clone()));
        Ok(Self {
            output,
            store: Arc::new(DropboxStore::new(token)),
            archiver: Arc::new(ZipArchiver),
            sink,
        })
    }

    /// Backup/restore pipeline over this context's store and archiver.
    #[must_use]
    pub fn pipeline(&self) -> SavePipeline<DropboxStore, ZipArchiver> {
        SavePipeline::new(
            Arc::clone(&self.store),
            Arc::clone(&self.archiver),
            Arc::clone(&self.sink),
        )
    }

    /// Fetch and parse the remote configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](crate::domain::ConfigError); fatal to the
    /// invoking command.
    pub async fn load_registry(&self) -> Result<SaveRegistry> {
        Ok(SaveRegistry::load(self.store.as_ref()).await?)
    }
}
