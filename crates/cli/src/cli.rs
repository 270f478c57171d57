use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::{Path, PathBuf};

/// oom-sentry: the cgroup memory pressure sentry
///
/// oom-sentry watches the memory usage of the other processes on the host
/// against their cgroup limits and signals them when usage crosses the
/// configured warning or critical percentage, logging NUMA placement
/// diagnostics at each escalation.
#[derive(Debug, Parser, Clone)]
#[command(about, long_about, version)]
pub struct Cli {
    /// Path to configuration file.
    ///
    /// If not provided, `/etc/oom-sentry/config.toml` is used when it
    /// exists, otherwise the built-in defaults apply.
    #[arg(short, long, value_parser = validate_file)]
    pub conffile: Option<PathBuf>,

    /// Polling interval in seconds, overriding the configuration file.
    #[arg(short, long, value_parser = validate_interval)]
    pub interval: Option<u64>,

    /// Evaluate every process once and exit instead of polling.
    #[arg(long)]
    pub oneshot: bool,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.exists() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}

/// A zero interval would spin on the process table.
#[inline(always)]
fn validate_interval(interval: &str) -> Result<u64, String> {
    let interval: u64 = interval
        .parse()
        .map_err(|_| format!("`{interval}` is not a valid interval"))?;
    if interval == 0 {
        return Err("Interval must be at least 1 second".to_string());
    }
    Ok(interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_conffile_is_rejected() {
        assert!(validate_file("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn existing_conffile_is_accepted() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = validate_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(path, file.path());
    }

    #[test]
    fn zero_and_garbage_intervals_are_rejected() {
        assert!(validate_interval("0").is_err());
        assert!(validate_interval("two").is_err());
        assert_eq!(validate_interval("30"), Ok(30));
    }
}
