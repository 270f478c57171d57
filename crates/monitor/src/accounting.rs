#![forbid(unsafe_code)]

use crate::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Memory accounting provider for a cgroup-confined process.
pub trait Accounting: Send + Sync {
    /// Current memory limit and usage in bytes for the process's cgroup.
    /// A limit of zero means the cgroup is unbounded.
    fn limit_and_usage(&self, pid: i32) -> Result<(u64, u64), Error>;

    /// Formatted NUMA statistics for the process's cgroup. The text is
    /// passed through verbatim for operator inspection, never parsed.
    fn numa_stat(&self, pid: i32) -> Result<String, Error>;
}

/// cgroup v1 reports "no limit" as the page-rounded maximum of a signed
/// 64-bit counter rather than a sentinel string.
const V1_UNLIMITED: u64 = i64::MAX as u64 & !4095;

/// Accounting backed by the cgroup filesystem, v2 unified hierarchy with a
/// v1 memory-controller fallback.
#[derive(Debug, Clone)]
pub struct CgroupAccounting {
    cgroup_root: PathBuf,
    proc_root: PathBuf,
}

impl Default for CgroupAccounting {
    fn default() -> Self {
        Self {
            cgroup_root: PathBuf::from("/sys/fs/cgroup"),
            proc_root: PathBuf::from("/proc"),
        }
    }
}

impl CgroupAccounting {
    /// Accounting rooted at the given cgroup and proc mount points. Mostly
    /// useful for pointing the provider at a fixture tree in tests.
    pub fn with_roots(cgroup_root: impl Into<PathBuf>, proc_root: impl Into<PathBuf>) -> Self {
        Self {
            cgroup_root: cgroup_root.into(),
            proc_root: proc_root.into(),
        }
    }

    /// Directory holding the memory accounting files for the cgroup `pid`
    /// belongs to. The v1 memory controller mount is authoritative when
    /// present (hybrid hosts); otherwise the unified v2 hierarchy is used.
    fn memory_dir(&self, pid: i32) -> Result<PathBuf, Error> {
        let path = self.proc_root.join(pid.to_string()).join("cgroup");
        let text =
            std::fs::read_to_string(&path).map_err(|source| Error::accounting(pid, source))?;

        let mut unified = None;
        let mut v1_memory = None;
        for line in text.lines() {
            let mut fields = line.splitn(3, ':');
            let (Some(_), Some(controllers), Some(pathname)) =
                (fields.next(), fields.next(), fields.next())
            else {
                continue;
            };
            if controllers.is_empty() {
                unified = Some(pathname);
            } else if controllers.split(',').any(|c| c == "memory") {
                v1_memory = Some(pathname);
            }
        }

        if let Some(pathname) = v1_memory {
            return Ok(self
                .cgroup_root
                .join("memory")
                .join(pathname.trim_start_matches('/')));
        }
        if let Some(pathname) = unified {
            return Ok(self.cgroup_root.join(pathname.trim_start_matches('/')));
        }
        Err(Error::accounting(
            pid,
            io::Error::new(io::ErrorKind::NotFound, "no memory cgroup recorded"),
        ))
    }
}

impl Accounting for CgroupAccounting {
    fn limit_and_usage(&self, pid: i32) -> Result<(u64, u64), Error> {
        let dir = self.memory_dir(pid)?;
        let (limit, usage) = if dir.join("memory.current").is_file() {
            let limit = read_limit(&dir.join("memory.max"), pid)?;
            let usage = read_value(&dir.join("memory.current"), pid)?;
            (limit, usage)
        } else {
            let limit = read_limit(&dir.join("memory.limit_in_bytes"), pid)?;
            let usage = read_value(&dir.join("memory.usage_in_bytes"), pid)?;
            (limit, usage)
        };
        trace!(pid, limit, usage, "read cgroup accounting");
        Ok((limit, usage))
    }

    fn numa_stat(&self, pid: i32) -> Result<String, Error> {
        let dir = self.memory_dir(pid)?;
        std::fs::read_to_string(dir.join("memory.numa_stat"))
            .map_err(|source| Error::accounting(pid, source))
    }
}

fn read_value(path: &Path, pid: i32) -> Result<u64, Error> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::accounting(pid, source))?;
    text.trim().parse().map_err(|err| {
        Error::accounting(
            pid,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: {err}", path.display()),
            ),
        )
    })
}

/// Like [`read_value`], but mapping both spellings of "unbounded" (the v2
/// `max` sentinel and the v1 saturated counter) to zero.
fn read_limit(path: &Path, pid: i32) -> Result<u64, Error> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::accounting(pid, source))?;
    let text = text.trim();
    if text == "max" {
        return Ok(0);
    }
    let value: u64 = text.parse().map_err(|err| {
        Error::accounting(
            pid,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: {err}", path.display()),
            ),
        )
    })?;
    Ok(if value >= V1_UNLIMITED { 0 } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const PID: i32 = 4242;

    fn write_proc_cgroup(proc_root: &Path, contents: &str) {
        let dir = proc_root.join(PID.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("cgroup"), contents).unwrap();
    }

    #[test]
    fn v2_limit_and_usage() {
        let root = tempdir().unwrap();
        let (cgroup_root, proc_root) = (root.path().join("cgroup"), root.path().join("proc"));
        write_proc_cgroup(&proc_root, "0::/workload.slice\n");

        let dir = cgroup_root.join("workload.slice");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("memory.max"), "1000\n").unwrap();
        fs::write(dir.join("memory.current"), "500\n").unwrap();

        let accounting = CgroupAccounting::with_roots(cgroup_root, proc_root);
        assert_eq!(accounting.limit_and_usage(PID).unwrap(), (1000, 500));
    }

    #[test]
    fn v2_max_sentinel_means_no_limit() {
        let root = tempdir().unwrap();
        let (cgroup_root, proc_root) = (root.path().join("cgroup"), root.path().join("proc"));
        write_proc_cgroup(&proc_root, "0::/workload.slice\n");

        let dir = cgroup_root.join("workload.slice");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("memory.max"), "max\n").unwrap();
        fs::write(dir.join("memory.current"), "123456\n").unwrap();

        let accounting = CgroupAccounting::with_roots(cgroup_root, proc_root);
        assert_eq!(accounting.limit_and_usage(PID).unwrap(), (0, 123456));
    }

    #[test]
    fn v1_memory_controller_is_preferred() {
        let root = tempdir().unwrap();
        let (cgroup_root, proc_root) = (root.path().join("cgroup"), root.path().join("proc"));
        write_proc_cgroup(&proc_root, "0::/ignored\n4:memory:/workload\n");

        let dir = cgroup_root.join("memory").join("workload");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("memory.limit_in_bytes"), "2048\n").unwrap();
        fs::write(dir.join("memory.usage_in_bytes"), "1024\n").unwrap();

        let accounting = CgroupAccounting::with_roots(cgroup_root, proc_root);
        assert_eq!(accounting.limit_and_usage(PID).unwrap(), (2048, 1024));
    }

    #[test]
    fn v1_saturated_counter_means_no_limit() {
        let root = tempdir().unwrap();
        let (cgroup_root, proc_root) = (root.path().join("cgroup"), root.path().join("proc"));
        write_proc_cgroup(&proc_root, "4:memory:/workload\n");

        let dir = cgroup_root.join("memory").join("workload");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("memory.limit_in_bytes"), "9223372036854771712\n").unwrap();
        fs::write(dir.join("memory.usage_in_bytes"), "77\n").unwrap();

        let accounting = CgroupAccounting::with_roots(cgroup_root, proc_root);
        assert_eq!(accounting.limit_and_usage(PID).unwrap(), (0, 77));
    }

    #[test]
    fn numa_stat_is_passed_through_verbatim() {
        let root = tempdir().unwrap();
        let (cgroup_root, proc_root) = (root.path().join("cgroup"), root.path().join("proc"));
        write_proc_cgroup(&proc_root, "0::/workload.slice\n");

        let dir = cgroup_root.join("workload.slice");
        fs::create_dir_all(&dir).unwrap();
        let stat = "anon N0=4096 N1=0\nfile N0=8192 N1=4096\n";
        fs::write(dir.join("memory.numa_stat"), stat).unwrap();

        let accounting = CgroupAccounting::with_roots(cgroup_root, proc_root);
        assert_eq!(accounting.numa_stat(PID).unwrap(), stat);
    }

    #[test]
    fn missing_cgroup_record_is_an_accounting_error() {
        let root = tempdir().unwrap();
        let accounting =
            CgroupAccounting::with_roots(root.path().join("cgroup"), root.path().join("proc"));
        assert!(matches!(
            accounting.limit_and_usage(PID),
            Err(Error::Accounting { pid: PID, .. })
        ));
    }

    #[test]
    fn missing_accounting_files_are_an_accounting_error() {
        let root = tempdir().unwrap();
        let (cgroup_root, proc_root) = (root.path().join("cgroup"), root.path().join("proc"));
        write_proc_cgroup(&proc_root, "0::/gone.slice\n");

        let accounting = CgroupAccounting::with_roots(cgroup_root, proc_root);
        assert!(matches!(
            accounting.limit_and_usage(PID),
            Err(Error::Accounting { pid: PID, .. })
        ));
    }
}
