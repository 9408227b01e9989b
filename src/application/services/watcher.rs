//! Application service — process start/exit watching.
//!
//! Per watched name the state machine is: unseen → (observed running) →
//! tracking → (process exits) → exit reported exactly once → unseen again,
//! once the orchestrator re-arms the name after its backup completes.
//! Tracking one process never blocks detection of another starting: each
//! tracked instance gets its own waiter task, all reporting back through a
//! shared completion channel.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::time::sleep;

use crate::application::ports::{EventSink, ProcessProbe, RunningProcess};

/// Interval between process-table snapshots.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Interval between liveness checks of a tracked process.
pub const LIVENESS_INTERVAL: Duration = Duration::from_millis(500);

// ── Watch set ─────────────────────────────────────────────────────────────────

/// The configured names currently being polled for process start.
///
/// A name leaves the set the instant its process is observed running and is
/// re-added only after that exit has been fully processed — a name is in the
/// set XOR its process is being tracked.
#[derive(Debug, Default)]
pub struct WatchSet {
    names: BTreeSet<String>,
}

impl WatchSet {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, name: String) {
        self.names.insert(name);
    }

    /// Remove and report whether `name` was present.
    pub fn take(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ── Watcher ───────────────────────────────────────────────────────────────────

/// Polls the OS process table and fans out one waiter task per tracked
/// process instance.
pub struct ProcessWatcher<P> {
    probe: Arc<Mutex<P>>,
    poll_interval: Duration,
    liveness_interval: Duration,
    sink: Arc<dyn EventSink>,
}

impl<P: ProcessProbe + 'static> ProcessWatcher<P> {
    pub fn new(probe: P, sink: Arc<dyn EventSink>) -> Self {
        Self {
            probe: Arc::new(Mutex::new(probe)),
            poll_interval: POLL_INTERVAL,
            liveness_interval: LIVENESS_INTERVAL,
            sink,
        }
    }

    /// Override the polling cadence. Tests run with millisecond intervals.
    #[must_use]
    pub fn with_intervals(mut self, poll: Duration, liveness: Duration) -> Self {
        self.poll_interval = poll;
        self.liveness_interval = liveness;
        self
    }

    /// Run the watch loop. Never returns on its own; cancellation is
    /// whole-process shutdown.
    ///
    /// `rearm` re-inserts a name into the watch set once its exit has been
    /// fully processed; `exits` receives each tracked process's name exactly
    /// once, when it terminates.
    pub async fn run(
        self,
        initial: WatchSet,
        mut rearm: mpsc::Receiver<String>,
        exits: mpsc::Sender<String>,
    ) {
        let mut watching = initial;
        loop {
            while let Ok(name) = rearm.try_recv() {
                watching.insert(name);
            }

            if !watching.is_empty() {
                let snapshot = self.probe.lock().await.snapshot();
                for process in snapshot {
                    if watching.take(&process.name) {
                        self.sink.info(&format!("{} started", process.name));
                        tokio::spawn(wait_for_exit(
                            Arc::clone(&self.probe),
                            process,
                            self.liveness_interval,
                            exits.clone(),
                        ));
                    }
                }
            }

            sleep(self.poll_interval).await;
        }
    }
}

/// Block (on timers, not threads) until this exact process instance is gone,
/// then report its name once.
async fn wait_for_exit<P: ProcessProbe>(
    probe: Arc<Mutex<P>>,
    process: RunningProcess,
    every: Duration,
    exits: mpsc::Sender<String>,
) {
    loop {
        sleep(every).await;
        if !probe.lock().await.is_alive(&process) {
            break;
        }
    }
    // Receiver gone means the whole session is shutting down.
    let _ = exits.send(process.name).await;
}
