#![forbid(unsafe_code)]

mod error;
mod poll;
mod signals;
mod thresholds;

pub use error::Error;
pub use poll::Poll;
pub use signals::Signals;
pub use thresholds::Thresholds;

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub thresholds: Thresholds,
    pub signals: Signals,
    pub poll: Poll,
}

impl Config {
    /// Load configuration from a TOML file. Missing fields are filled with
    /// defaults; threshold constraints are checked before the config is
    /// handed out.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = toml_edit::de::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let toml = toml_edit::ser::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Check cross-field constraints. Signal names are not resolved here;
    /// the monitor validates them against its catalog at startup.
    pub fn validate(&self) -> Result<(), Error> {
        self.thresholds.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::default();
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[thresholds]\nwarning = 50\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.thresholds.warning, 50);
        assert_eq!(config.thresholds.critical, 95);
        assert_eq!(config.signals.warning, "SIGUSR1");
        assert_eq!(config.poll.interval, Duration::from_secs(2));
    }

    #[test]
    fn interval_is_read_in_seconds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[poll]\ninterval = 30\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.poll.interval, Duration::from_secs(30));
    }

    #[test]
    fn inverted_thresholds_fail_to_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[thresholds]\nwarning = 99\ncritical = 10\n").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(Error::ThresholdOrder { .. })
        ));
    }
}
