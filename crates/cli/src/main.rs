mod cli;

use clap::Parser;
use cli::Cli;
use config::Config;
use monitor::{CgroupAccounting, ControlEvent, ProcfsEnumerator, SentryEngine, Services, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // NOTE: The verbosity flag takes precedence over the environment
    // variable for log control. `OOM_SENTRY_LOG=warn oom-sentry -vvv` still
    // logs at the trace level; the environment variable can only set the
    // level per crate, not override the flag.
    let env_filter = EnvFilter::builder()
        .with_env_var("OOM_SENTRY_LOG")
        .from_env()?
        .add_directive(cli.verbosity.log_level_filter().as_str().parse()?);

    let layer = tracing_subscriber::fmt::layer()
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter)
        .init();

    // load config
    let mut config = match &cli.conffile {
        Some(path) => Config::load(path)?,
        _ => {
            let default = PathBuf::from("/etc/oom-sentry/config.toml");
            if default.exists() {
                Config::load(default)?
            } else {
                Config::default()
            }
        }
    };
    if let Some(seconds) = cli.interval {
        config.poll.interval = Duration::from_secs(seconds);
    }
    debug!(?config, ?cli);

    let accounting = Arc::new(CgroupAccounting::default());
    let services = Services {
        enumerator: Box::new(ProcfsEnumerator::new(accounting)),
        clock: Box::new(SystemClock),
    };

    // Signal names and thresholds are validated here, before anything is
    // evaluated, so a bad config never fails mid-incident.
    let mut engine = SentryEngine::new(config, services)?;

    if cli.oneshot {
        let report = engine.tick()?;
        info!(?report, "oneshot cycle complete");
        return Ok(());
    }

    // install signal handlers
    let cancel = CancellationToken::new();
    let (control_tx, control_rx) = mpsc::unbounded_channel();
    {
        let cancel = cancel.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigusr1 = signal(SignalKind::user_defined1())?;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = sigint.recv() => {
                        cancel.cancel();
                        break;
                    }
                    _ = sigterm.recv() => {
                        cancel.cancel();
                        break;
                    }
                    _ = sigusr1.recv() => {
                        if control_tx.send(ControlEvent::DumpStatus).is_err() {
                            break;
                        }
                    }
                }
            }
        });
    }

    engine.run_until(cancel, control_rx).await?;
    Ok(())
}
