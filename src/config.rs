// src/config.rs
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use clap::ValueEnum;

pub const DEFAULT_BASE_URL: &str = "https://www.nseindia.com";

/// The three filing types collected per symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ReportKind {
    Brsr,
    Annual,
    Announcements,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] =
        [ReportKind::Brsr, ReportKind::Annual, ReportKind::Announcements];

    /// Stem of the output file and of the debug snapshot directory.
    pub fn file_stem(self) -> &'static str {
        match self {
            ReportKind::Brsr => "brsr_reports",
            ReportKind::Annual => "annual_reports",
            ReportKind::Announcements => "announcements",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReportKind::Brsr => "brsr reports",
            ReportKind::Annual => "annual reports",
            ReportKind::Announcements => "announcements",
        };
        f.write_str(label)
    }
}

/// Step-level waits and pauses. The pauses stand in for readiness signals the
/// site doesn't expose (result tables render asynchronously with no marker
/// separating "empty" from "not loaded yet").
#[derive(Debug, Clone)]
pub struct Timings {
    /// Bound on each "wait for element" step.
    pub wait_timeout: Duration,
    /// Bound on the announcement table wait; that page is the slowest.
    pub announcement_timeout: Duration,
    /// Interval between readiness checks while waiting.
    pub poll_interval: Duration,
    /// Pause after triggering the BRSR filter.
    pub brsr_render_pause: Duration,
    /// Pause after loading an annual report or announcement page.
    pub table_settle: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(10),
            announcement_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(250),
            brsr_render_pause: Duration::from_secs(5),
            table_settle: Duration::from_secs(10),
        }
    }
}

/// How many symbols from the head of the list each report type processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceLimits {
    pub brsr: usize,
    pub annual: usize,
    pub announcements: usize,
}

impl SliceLimits {
    pub fn for_kind(&self, kind: ReportKind) -> usize {
        match kind {
            ReportKind::Brsr => self.brsr,
            ReportKind::Annual => self.annual,
            ReportKind::Announcements => self.announcements,
        }
    }
}

impl Default for SliceLimits {
    fn default() -> Self {
        Self {
            brsr: 200,
            annual: 200,
            announcements: 1,
        }
    }
}

/// Everything a collection run needs besides the symbols and the browser.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_url: String,
    pub workers: usize,
    pub max_retries: u32,
    pub limits: SliceLimits,
    pub reports: Vec<ReportKind>,
    pub timings: Timings,
    /// Base directory for failed-attempt page snapshots (written under
    /// `debug/`); `None` disables them.
    pub debug_dir: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            workers: 1,
            max_retries: 3,
            limits: SliceLimits::default(),
            reports: ReportKind::ALL.to_vec(),
            timings: Timings::default(),
            debug_dir: None,
        }
    }
}

impl RunConfig {
    pub fn runs(&self, kind: ReportKind) -> bool {
        self.reports.contains(&kind)
    }
}
