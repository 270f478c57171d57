#![forbid(unsafe_code)]

use crate::error::Error;
use nix::sys::signal::Signal;

/// The closed set of signal names accepted from configuration, mapped to
/// their OS values. Lookup is exact match, case sensitive.
///
/// `SIGIOT` is the historical POSIX alias of `SIGABRT` and resolves to the
/// same value on Linux.
const CATALOG: [(&str, Signal); 12] = [
    ("SIGABRT", Signal::SIGABRT),
    ("SIGCONT", Signal::SIGCONT),
    ("SIGHUP", Signal::SIGHUP),
    ("SIGINT", Signal::SIGINT),
    ("SIGIOT", Signal::SIGABRT),
    ("SIGKILL", Signal::SIGKILL),
    ("SIGQUIT", Signal::SIGQUIT),
    ("SIGSTOP", Signal::SIGSTOP),
    ("SIGTERM", Signal::SIGTERM),
    ("SIGTSTP", Signal::SIGTSTP),
    ("SIGUSR1", Signal::SIGUSR1),
    ("SIGUSR2", Signal::SIGUSR2),
];

/// Resolve a configured signal name against the catalog.
pub fn resolve(name: &str) -> Result<Signal, Error> {
    CATALOG
        .iter()
        .find(|(catalog_name, _)| *catalog_name == name)
        .map(|(_, signal)| *signal)
        .ok_or_else(|| Error::UnknownSignal(name.to_string()))
}

/// The pair of signals delivered on threshold crossings, resolved from
/// configuration once at startup. Defaults to `SIGUSR1`/`SIGUSR2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationSignals {
    pub warning: Signal,
    pub critical: Signal,
}

impl Default for EscalationSignals {
    fn default() -> Self {
        Self {
            warning: Signal::SIGUSR1,
            critical: Signal::SIGUSR2,
        }
    }
}

impl EscalationSignals {
    /// Resolve the configured names before the first polling cycle, so a
    /// bad name fails at startup rather than mid-incident.
    pub fn from_config(signals: &config::Signals) -> Result<Self, Error> {
        Ok(Self {
            warning: resolve(&signals.warning)?,
            critical: resolve(&signals.critical)?,
        })
    }
}
