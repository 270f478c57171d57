#![forbid(unsafe_code)]

use crate::error::Error;
use crate::process::Process;
use std::path::Path;

/// Invocation command line recorded for the process, for diagnostics and
/// reporting. Arguments keep whatever separator the proc record used; only
/// a single trailing newline is stripped, nothing is re-tokenized.
///
/// Fails if the record is unreadable, commonly because the process already
/// exited. That race is inherent to inspecting live process state.
pub fn cmd_line(proc: &dyn Process) -> Result<String, Error> {
    cmd_line_from(Path::new("/proc"), proc.pid())
}

pub(crate) fn cmd_line_from(proc_root: &Path, pid: i32) -> Result<String, Error> {
    let path = proc_root.join(pid.to_string()).join("cmdline");
    let raw = std::fs::read(&path).map_err(|source| Error::accounting(pid, source))?;
    let text = String::from_utf8_lossy(&raw).into_owned();
    Ok(strip_trailing_newline(text))
}

fn strip_trailing_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
    }
    text
}
