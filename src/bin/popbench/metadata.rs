//! Metadata recorded alongside JSON reports.
//!
//! Collects the timestamp and enough about the host to compare runs, using
//! only what the standard library and CPU feature detection report.

use chrono::{DateTime, Local, Utc};
use popbench::{Capability, Config, Report};
use serde::Serialize;

/// Host information.
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub cpu_cores: u32,
    pub os: String,
    pub arch: String,
    /// Whether the CPU reports the `popcnt` instruction
    pub popcnt: bool,
}

/// Complete record of one run.
#[derive(Debug, Serialize)]
pub struct RunRecord<'a> {
    pub timestamp: String,
    pub timestamp_local: String,
    pub system: SystemInfo,
    pub config: &'a Config,
    pub report: Report,
}

impl<'a> RunRecord<'a> {
    pub fn new(config: &'a Config, report: Report) -> Self {
        let now_utc: DateTime<Utc> = Utc::now();
        let now_local: DateTime<Local> = Local::now();

        Self {
            timestamp: now_utc.to_rfc3339(),
            timestamp_local: now_local.format("%Y-%m-%d %H:%M:%S %Z").to_string(),
            system: collect_system_info(),
            config,
            report,
        }
    }
}

/// Collect host information.
pub fn collect_system_info() -> SystemInfo {
    let cpu_cores = std::thread::available_parallelism()
        .map(|p| p.get() as u32)
        .unwrap_or(1);

    SystemInfo {
        cpu_cores,
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        popcnt: Capability::Popcnt.is_available(),
    }
}
