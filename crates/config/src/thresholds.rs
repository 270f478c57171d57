#![forbid(unsafe_code)]

use crate::error::Error;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Thresholds {
    /// Percentage of the cgroup memory limit at which a process is sent the
    /// warning signal and its NUMA placement is logged. Processes whose
    /// cgroup has no memory limit configured never cross any threshold.
    pub warning: u64,

    /// Percentage of the cgroup memory limit at which the critical signal is
    /// sent. Must be strictly above the warning threshold; a process at or
    /// above this level gets the critical escalation only, not both.
    pub critical: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: 80,
            critical: 95,
        }
    }
}

impl Thresholds {
    /// Cross-field constraints serde defaults cannot express.
    pub fn validate(&self) -> Result<(), Error> {
        for percent in [self.warning, self.critical] {
            if !(1..=100).contains(&percent) {
                return Err(Error::ThresholdRange(percent));
            }
        }
        if self.warning >= self.critical {
            return Err(Error::ThresholdOrder {
                warning: self.warning,
                critical: self.critical,
            });
        }
        Ok(())
    }
}
