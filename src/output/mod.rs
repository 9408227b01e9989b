//! Output formatting module

pub mod progress;
pub mod stream;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use stream::LogStream;
pub use styles::Styles;

use crate::application::ports::{EventSink, LogLevel, LogRecord};

/// Output context carrying styling and terminal state.
#[derive(Clone)]
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `→`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "→".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }
}

/// Terminal-backed [`EventSink`].
///
/// Wraps an `OutputContext` so application services can emit status lines
/// without depending on any presentation type directly.
pub struct TerminalSink {
    ctx: OutputContext,
}

impl TerminalSink {
    #[must_use]
    pub fn new(ctx: OutputContext) -> Self {
        Self { ctx }
    }
}

impl EventSink for TerminalSink {
    fn emit(&self, record: LogRecord) {
        match record.level {
            LogLevel::Info => self.ctx.info(&record.message),
            LogLevel::Success => self.ctx.success(&record.message),
            LogLevel::Warn => self.ctx.warn(&record.message),
            LogLevel::Error => self.ctx.error(&record.message),
        }
    }
}
