#![forbid(unsafe_code)]

use crate::error::Error;
use crate::process::Process;
use tracing::{error, warn};

/// Log a warning-severity memory report for the process, then its NUMA
/// placement. The threshold comparison is the caller's job; once invoked
/// this always performs one accounting read, one report line, one NUMA
/// read and one NUMA log.
///
/// A failed accounting read returns before the NUMA fetch; the wording of
/// the report line is load-bearing for operator tooling that greps logs.
pub fn report_warning(proc: &dyn Process) -> Result<(), Error> {
    let percent = proc.memory_usage_percent()?;
    warn!(
        "Warning memory usage on pid {}'s cgroup: {}%",
        proc.pid(),
        percent
    );
    report_numa(proc)
}

/// Critical-severity counterpart of [`report_warning`].
pub fn report_critical(proc: &dyn Process) -> Result<(), Error> {
    let percent = proc.memory_usage_percent()?;
    error!(
        "Critical memory usage on pid {}'s cgroup: {}%",
        proc.pid(),
        percent
    );
    report_numa(proc)
}

fn report_numa(proc: &dyn Process) -> Result<(), Error> {
    let stat = proc.numa_stat()?;
    warn!("numa:\n{stat}");
    Ok(())
}
