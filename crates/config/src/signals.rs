#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Signals {
    /// Canonical name of the signal delivered on a warning escalation.
    ///
    /// Names are matched exactly, case sensitive, against the closed catalog
    /// of supported signals (`SIGUSR1`, `SIGTERM`, ...). An unknown name is
    /// rejected at startup, before the first polling cycle, so a typo can
    /// never surface mid-incident.
    pub warning: String,

    /// Canonical name of the signal delivered on a critical escalation.
    /// Same catalog and validation rules as `warning`.
    pub critical: String,
}

impl Default for Signals {
    fn default() -> Self {
        Self {
            warning: "SIGUSR1".to_string(),
            critical: "SIGUSR2".to_string(),
        }
    }
}
