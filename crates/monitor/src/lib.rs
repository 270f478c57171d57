#![forbid(unsafe_code)]

pub mod accounting;
pub mod clock;
pub mod cmdline;
pub mod engine;
pub mod enumerate;
pub mod error;
pub mod escalation;
pub mod process;
pub mod signals;

pub use accounting::{Accounting, CgroupAccounting};
pub use clock::{Clock, SystemClock};
pub use cmdline::cmd_line;
pub use engine::{ControlEvent, SentryEngine, Services, TickReport};
pub use enumerate::{Enumerator, ProcfsEnumerator};
pub use error::Error;
pub use escalation::{report_critical, report_warning};
pub use process::{OsProcess, Process, usage_percent};
pub use signals::{EscalationSignals, resolve};
