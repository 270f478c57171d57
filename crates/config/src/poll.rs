#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::time::Duration;

#[serde_as]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Poll {
    /// How often every tracked process is evaluated. **Measured in
    /// seconds**.
    ///
    /// ## Note
    ///
    /// Each cycle reads the cgroup accounting files of every other process
    /// on the host. Setting this too low adds measurable kernel I/O on
    /// hosts with large process tables.
    #[serde_as(as = "serde_with::DurationSeconds")]
    pub interval: Duration,
}

impl Default for Poll {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
        }
    }
}
