#![forbid(unsafe_code)]

use crate::clock::Clock;
use crate::cmdline::cmd_line;
use crate::enumerate::Enumerator;
use crate::error::Error;
use crate::escalation::{report_critical, report_warning};
use crate::process::Process;
use crate::signals::EscalationSignals;
use config::Config;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct Services {
    pub enumerator: Box<dyn Enumerator>,
    pub clock: Box<dyn Clock>,
}

pub enum ControlEvent {
    DumpStatus,
}

/// Outcome of a single polling cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub scanned: usize,
    pub warnings: usize,
    pub criticals: usize,
    pub failures: usize,
}

/// Drives the per-process evaluation once per polling interval: enumerate,
/// read each process's usage percentage, compare against the configured
/// thresholds and escalate on a crossing. Holds no per-process state
/// between cycles.
pub struct SentryEngine {
    config: Config,
    signals: EscalationSignals,
    services: Services,
    ticks: u64,
    last_report: TickReport,
}

impl SentryEngine {
    /// Build an engine, resolving the configured signal names up front so
    /// a bad name fails here rather than mid-incident.
    pub fn new(config: Config, services: Services) -> Result<Self, Error> {
        config.validate().map_err(Error::Config)?;
        let signals = EscalationSignals::from_config(&config.signals)?;
        Ok(Self {
            config,
            signals,
            services,
            ticks: 0,
            last_report: TickReport::default(),
        })
    }

    /// Evaluate every tracked process once.
    pub fn tick(&mut self) -> Result<TickReport, Error> {
        self.ticks = self.ticks.saturating_add(1);
        let mut report = TickReport::default();

        for process in self.services.enumerator.others()? {
            report.scanned += 1;
            if let Err(err) = self.evaluate(process.as_ref(), &mut report) {
                // One failing process must not abort the cycle for the rest.
                warn!(pid = process.pid(), %err, "evaluation failed");
                report.failures += 1;
            }
        }

        debug!(?report, tick = self.ticks, "cycle complete");
        self.last_report = report;
        Ok(report)
    }

    fn evaluate(&self, process: &dyn Process, report: &mut TickReport) -> Result<(), Error> {
        let percent = process.memory_usage_percent()?;
        if percent < self.config.thresholds.warning {
            return Ok(());
        }

        // Best effort; the record vanishes if the process is already gone.
        if let Ok(cmd) = cmd_line(process) {
            debug!(pid = process.pid(), cmd = %cmd, "escalating");
        }

        if percent >= self.config.thresholds.critical {
            report_critical(process)?;
            process.signal(self.signals.critical)?;
            report.criticals += 1;
        } else {
            report_warning(process)?;
            process.signal(self.signals.warning)?;
            report.warnings += 1;
        }
        Ok(())
    }

    /// Run cycles until the cancellation token is triggered.
    pub async fn run_until(
        &mut self,
        cancel: CancellationToken,
        mut control_rx: mpsc::UnboundedReceiver<ControlEvent>,
    ) -> Result<(), Error> {
        loop {
            if cancel.is_cancelled() {
                info!("shutdown requested");
                break;
            }

            let tick_start = self.services.clock.now();
            match self.tick() {
                Ok(_) => {}
                // Transient under pid churn; keep polling.
                Err(Error::NoOtherProcess) => warn!("no other process found"),
                Err(err) => return Err(err),
            }

            let interval = self.config.poll.interval;
            let sleep_for = interval.saturating_sub(tick_start.elapsed());
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("shutdown requested");
                    break;
                }
                Some(event) = control_rx.recv() => {
                    self.handle_control(event);
                }
                _ = self.services.clock.sleep(sleep_for) => {}
            }
        }

        Ok(())
    }

    fn handle_control(&self, event: ControlEvent) {
        match event {
            ControlEvent::DumpStatus => self.dump_status(),
        }
    }

    fn dump_status(&self) {
        info!(?self.config, "current config");
        info!(
            ticks = self.ticks,
            scanned = self.last_report.scanned,
            warnings = self.last_report.warnings,
            criticals = self.last_report.criticals,
            failures = self.last_report.failures,
            "state summary"
        );
    }
}
