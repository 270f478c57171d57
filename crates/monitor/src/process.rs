#![forbid(unsafe_code)]

use crate::accounting::Accounting;
use crate::error::Error;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::sync::Arc;

/// Minimal contract a trackable process must satisfy: identity, signal
/// delivery, memory accounting, NUMA inspection. Keeps the escalation
/// logic independent of the host process table.
pub trait Process: Send + Sync {
    /// Stable identifier of the underlying process.
    fn pid(&self) -> i32;

    /// Deliver an OS signal to the underlying process. Fails if the process
    /// is gone or the caller lacks permission; no retry.
    fn signal(&self, signal: Signal) -> Result<(), Error>;

    /// Memory usage as an integer percentage of the cgroup limit. A cgroup
    /// with no limit configured reports zero, so an unconfined process can
    /// never trigger an escalation.
    fn memory_usage_percent(&self) -> Result<u64, Error>;

    /// NUMA statistics snapshot for the process's cgroup, verbatim.
    fn numa_stat(&self) -> Result<String, Error>;
}

/// A live host process, accounted through an injected [`Accounting`]
/// provider. Holds only the pid; process lifecycle is not owned here.
pub struct OsProcess {
    pid: Pid,
    accounting: Arc<dyn Accounting>,
}

impl OsProcess {
    pub fn new(pid: i32, accounting: Arc<dyn Accounting>) -> Self {
        Self {
            pid: Pid::from_raw(pid),
            accounting,
        }
    }
}

impl Process for OsProcess {
    fn pid(&self) -> i32 {
        self.pid.as_raw()
    }

    fn signal(&self, sig: Signal) -> Result<(), Error> {
        signal::kill(self.pid, sig).map_err(|source| Error::Delivery {
            pid: self.pid.as_raw(),
            signal: sig,
            source,
        })
    }

    fn memory_usage_percent(&self) -> Result<u64, Error> {
        let (limit, usage) = self.accounting.limit_and_usage(self.pid.as_raw())?;
        Ok(usage_percent(limit, usage))
    }

    fn numa_stat(&self) -> Result<String, Error> {
        self.accounting.numa_stat(self.pid.as_raw())
    }
}

/// Integer percentage of `limit` used, floor division. A zero limit means
/// the cgroup is unbounded and reports zero rather than dividing.
pub fn usage_percent(limit: u64, usage: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    // u128 so usage * 100 cannot overflow near u64::MAX.
    let percent = (u128::from(usage) * 100) / u128::from(limit);
    u64::try_from(percent).unwrap_or(u64::MAX)
}
