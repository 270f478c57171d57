#![forbid(unsafe_code)]

use nix::sys::signal::Signal;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The accounting source for a process could not be read. Commonly the
    /// process has exited, is not cgroup-confined, or the caller lacks
    /// permission to read its cgroup files.
    #[error("Failed to read memory accounting for pid {pid}: {source}")]
    Accounting {
        pid: i32,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to deliver {signal} to pid {pid}: {source}")]
    Delivery {
        pid: i32,
        signal: Signal,
        #[source]
        source: nix::Error,
    },

    #[error("Unknown signal name: {0}")]
    UnknownSignal(String),

    #[error("no other process found")]
    NoOtherProcess,

    #[error("Failed to list the process table: {0}")]
    Enumeration(#[from] procfs::ProcError),

    #[error("Failed to load config: {0}")]
    Config(#[from] config::Error),
}

impl Error {
    /// Wrap an I/O failure from the accounting source for `pid`.
    pub fn accounting(pid: i32, source: std::io::Error) -> Self {
        Self::Accounting { pid, source }
    }
}
