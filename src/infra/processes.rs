//! Infrastructure implementation of the `ProcessProbe` port using sysinfo.

use sysinfo::{Pid, ProcessRefreshKind, RefreshKind, System};

use crate::application::ports::{ProcessProbe, RunningProcess};

/// OS process table probe.
pub struct SystemProbe {
    system: System,
}

impl SystemProbe {
    #[must_use]
    pub fn new() -> Self {
        Self {
            system: System::new_with_specifics(
                RefreshKind::new().with_processes(ProcessRefreshKind::new()),
            ),
        }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe for SystemProbe {
    fn snapshot(&mut self) -> Vec<RunningProcess> {
        self.system.refresh_processes();
        self.system
            .processes()
            .iter()
            .map(|(pid, process)| RunningProcess {
                pid: pid.as_u32(),
                started_at: process.start_time(),
                name: process.name().to_string(),
            })
            .collect()
    }

    fn is_alive(&mut self, process: &RunningProcess) -> bool {
        let pid = Pid::from_u32(process.pid);
        if !self.system.refresh_process(pid) {
            return false;
        }
        // Same PID but a different start time is a recycled PID, not the
        // instance being tracked.
        self.system
            .process(pid)
            .is_some_and(|p| p.start_time() == process.started_at)
    }
}
