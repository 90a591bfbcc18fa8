// src/extractors/mod.rs
pub mod annual;
pub mod announcements;
pub mod brsr;
pub mod table;

use chrono::NaiveDate;
use url::Url;
use crate::browser::{BrowserSession, SessionFactory};
use crate::config::{ReportKind, RunConfig};
use crate::symbols::Symbol;
use crate::utils::error::ExtractError;
use crate::utils::html_debug;

// Re-export key extraction types for convenience
pub use annual::AnnualReport;
pub use announcements::Announcement;

/// What one successful routine run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Filing {
    /// `None` when the download control opened no tab.
    Brsr(Option<String>),
    Annual(Vec<AnnualReport>),
    Announcements(Vec<Announcement>),
}

/// `<base><path>?symbol=<S>[&tabIndex=equity]`, with the symbol query-encoded.
pub(crate) fn page_url(
    base_url: &str,
    path: &str,
    symbol: &Symbol,
    equity_tab: bool,
) -> Result<Url, ExtractError> {
    let mut url = Url::parse(base_url)?.join(path)?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("symbol", symbol.as_str());
        if equity_tab {
            query.append_pair("tabIndex", "equity");
        }
    }
    Ok(url)
}

/// Runs one attempt of the `kind` routine in a fresh session.
///
/// The session is closed on every path; with a debug directory configured,
/// a failed attempt's page is snapshotted first.
pub async fn run_routine<F: SessionFactory>(
    factory: &F,
    kind: ReportKind,
    symbol: &Symbol,
    attempt: u32,
    config: &RunConfig,
    today: NaiveDate,
) -> Result<Filing, ExtractError> {
    let mut session = factory.create_session().await?;

    let base_url = config.base_url.as_str();
    let timings = &config.timings;
    let outcome = match kind {
        ReportKind::Brsr => {
            brsr::extract_brsr_report(&mut session, symbol, base_url, timings, today)
                .await
                .map(Filing::Brsr)
        }
        ReportKind::Annual => {
            annual::extract_annual_reports(&mut session, symbol, base_url, timings)
                .await
                .map(Filing::Annual)
        }
        ReportKind::Announcements => {
            announcements::extract_announcements(&mut session, symbol, base_url, timings)
                .await
                .map(Filing::Announcements)
        }
    };

    if let Err(e) = &outcome {
        tracing::error!("Failed to extract {} for {}: {}", kind, symbol, e);
        if let Some(dir) = &config.debug_dir {
            snapshot_page(&mut session, dir, kind, symbol, attempt).await;
        }
    }

    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close browser session for {}: {}", symbol, e);
    }

    outcome
}

async fn snapshot_page<S: BrowserSession>(
    session: &mut S,
    dir: &std::path::Path,
    kind: ReportKind,
    symbol: &Symbol,
    attempt: u32,
) {
    match session.content().await {
        Ok(html) => {
            let saved = html_debug::save_page_snapshot(
                dir,
                kind.file_stem(),
                symbol.as_str(),
                attempt,
                &html,
            );
            if let Err(e) = saved {
                tracing::warn!("Failed to save debug snapshot for {}: {}", symbol, e);
            }
        }
        Err(e) => tracing::warn!("Could not read page content for {}: {}", symbol, e),
    }
}
