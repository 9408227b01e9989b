//! Subscribable log record feed.
//!
//! An embedding front end (a GUI rendering pipeline progress) constructs a
//! `LogStream`, hands it to the services as their `EventSink`, and consumes
//! records from any number of subscriptions. Append-only, no replay: a
//! subscriber only sees records emitted after it subscribed, and a slow
//! subscriber that falls behind the buffer loses the oldest records.

use tokio::sync::broadcast;

use crate::application::ports::{EventSink, LogRecord};

const DEFAULT_CAPACITY: usize = 256;

/// Broadcast-backed [`EventSink`].
pub struct LogStream {
    tx: broadcast::Sender<LogRecord>,
}

impl LogStream {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// New subscription seeing every record emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LogRecord> {
        self.tx.subscribe()
    }
}

impl Default for LogStream {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogStream {
    fn emit(&self, record: LogRecord) {
        // No subscribers is fine; records are simply dropped.
        let _ = self.tx.send(record);
    }
}

/// Fan a record out to several sinks, e.g. terminal plus stream.
pub struct FanoutSink {
    sinks: Vec<std::sync::Arc<dyn EventSink>>,
}

impl FanoutSink {
    #[must_use]
    pub fn new(sinks: Vec<std::sync::Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }
}

impl EventSink for FanoutSink {
    fn emit(&self, record: LogRecord) {
        for sink in &self.sinks {
            sink.emit(record.clone());
        }
    }
}
