// src/main.rs
mod browser;
mod config;
mod extractors;
mod results;
mod runner;
mod storage;
mod symbols;
mod utils;

use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use browser::{ChromeFactory, ChromeOptions};
use config::{ReportKind, RunConfig, SliceLimits, Timings, DEFAULT_BASE_URL};
use storage::StorageManager;
use utils::AppError;

/// Collects BRSR, annual report and announcement filings from NSE India
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file listing the companies to process
    #[arg(short, long, default_value = "ind_nifty500list.csv")]
    symbols_file: PathBuf,

    /// Header of the CSV column holding the symbols
    #[arg(long, default_value = "Symbol")]
    symbol_column: String,

    /// Output directory for the JSON result files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Concurrent browser sessions per report type
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Attempts per symbol before giving up
    #[arg(long, default_value_t = 3)]
    max_retries: u32,

    /// Number of symbols (from the top of the list) to fetch BRSR reports for
    #[arg(long, default_value_t = 200)]
    brsr_limit: usize,

    /// Number of symbols to fetch annual reports for
    #[arg(long, default_value_t = 200)]
    annual_limit: usize,

    /// Number of symbols to fetch announcements for
    #[arg(long, default_value_t = 1)]
    announcement_limit: usize,

    /// Report types to collect (default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    reports: Vec<ReportKind>,

    /// Run Chrome without a window
    #[arg(long)]
    headless: bool,

    /// Chrome/Chromium executable (autodetected if omitted)
    #[arg(long)]
    chrome_path: Option<PathBuf>,

    /// Site root the filing pages are served from
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Debug mode - save the page HTML of every failed attempt
    #[arg(short, long)]
    debug: bool,

    /// Bound on each "wait for element" step, in seconds
    #[arg(long, default_value_t = 10)]
    wait_timeout_secs: u64,

    /// Bound on the announcement table wait, in seconds
    #[arg(long, default_value_t = 20)]
    announcement_timeout_secs: u64,

    /// Pause after triggering the BRSR filter, in seconds
    #[arg(long, default_value_t = 5)]
    brsr_render_pause_secs: u64,

    /// Pause after loading a report table page, in seconds
    #[arg(long, default_value_t = 10)]
    table_settle_secs: u64,
}

impl Args {
    fn run_config(&self) -> Result<RunConfig, AppError> {
        if self.workers == 0 {
            return Err(AppError::Config("--workers must be at least 1".to_string()));
        }
        url::Url::parse(&self.base_url).map_err(|e| {
            AppError::Config(format!("Invalid --base-url '{}': {}", self.base_url, e))
        })?;

        Ok(RunConfig {
            base_url: self.base_url.clone(),
            workers: self.workers,
            max_retries: self.max_retries,
            limits: SliceLimits {
                brsr: self.brsr_limit,
                annual: self.annual_limit,
                announcements: self.announcement_limit,
            },
            reports: if self.reports.is_empty() {
                ReportKind::ALL.to_vec()
            } else {
                self.reports.clone()
            },
            timings: Timings {
                wait_timeout: Duration::from_secs(self.wait_timeout_secs),
                announcement_timeout: Duration::from_secs(self.announcement_timeout_secs),
                brsr_render_pause: Duration::from_secs(self.brsr_render_pause_secs),
                table_settle: Duration::from_secs(self.table_settle_secs),
                ..Timings::default()
            },
            debug_dir: self.debug.then(|| self.output_dir.clone()),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting collection for args: {:?}", args);
    let config = args.run_config()?;

    // 3. Load symbols and prepare the output directory before any browser work
    let symbols = symbols::load_symbols(&args.symbols_file, &args.symbol_column)?;
    if symbols.is_empty() {
        tracing::warn!(
            "No symbols found in {}; writing empty results",
            args.symbols_file.display()
        );
    }
    let storage = StorageManager::new(&args.output_dir)?;

    // 4. One Chrome per task, launched with fixed options
    let factory = ChromeFactory::new(ChromeOptions {
        headless: args.headless,
        executable: args.chrome_path.clone(),
        poll_interval: config.timings.poll_interval,
        ..ChromeOptions::default()
    });

    // 5. Run the pools, one report type after another
    let started = chrono::Local::now();
    let today = started.date_naive();
    let collected = runner::collect_filings(&factory, &symbols, &config, today).await;

    // 6. Write everything once, at the end
    storage.save_all(&collected)?;
    if collected.is_empty() {
        tracing::warn!("No filings were collected");
    }

    let elapsed = chrono::Local::now() - started;
    tracing::info!(
        "All tasks completed in {}s. BRSR reports: {}, Annual reports: {}, Announcements: {}",
        elapsed.num_seconds(),
        collected.brsr.len(),
        collected.annual.len(),
        collected.announcements.len()
    );

    Ok(())
}
