#![forbid(unsafe_code)]

use crate::accounting::{Accounting, CgroupAccounting};
use crate::error::Error;
use crate::process::{OsProcess, Process};
use std::sync::Arc;
use tracing::warn;

/// Source of candidate processes for the engine to evaluate.
pub trait Enumerator: Send + Sync {
    /// All other live processes on the host, excluding the caller's own.
    /// A table with nothing else in it is an error, not an empty success.
    fn others(&self) -> Result<Vec<Box<dyn Process>>, Error>;
}

/// Enumerator over the real host process table via procfs.
pub struct ProcfsEnumerator {
    accounting: Arc<dyn Accounting>,
}

impl ProcfsEnumerator {
    pub fn new(accounting: Arc<dyn Accounting>) -> Self {
        Self { accounting }
    }

    fn from_pids(
        &self,
        pids: impl IntoIterator<Item = i32>,
        own: i32,
    ) -> Result<Vec<Box<dyn Process>>, Error> {
        let processes: Vec<Box<dyn Process>> = pids
            .into_iter()
            .filter(|pid| *pid != own)
            .map(|pid| {
                Box::new(OsProcess::new(pid, Arc::clone(&self.accounting))) as Box<dyn Process>
            })
            .collect();
        if processes.is_empty() {
            return Err(Error::NoOtherProcess);
        }
        Ok(processes)
    }
}

impl Default for ProcfsEnumerator {
    fn default() -> Self {
        Self::new(Arc::new(CgroupAccounting::default()))
    }
}

impl Enumerator for ProcfsEnumerator {
    fn others(&self) -> Result<Vec<Box<dyn Process>>, Error> {
        let mut pids = Vec::new();
        for entry in procfs::process::all_processes()? {
            match entry {
                Ok(process) => pids.push(process.pid),
                Err(err) => {
                    // Processes exit between readdir and stat; skip them.
                    warn!(?err, "failed to read process entry");
                }
            }
        }
        self.from_pids(pids, std::process::id() as i32)
    }
}
