// src/extractors/announcements.rs
use serde::{Deserialize, Serialize};
use url::Url;
use crate::browser::{BrowserSession, WaitCondition};
use crate::config::Timings;
use crate::extractors::table::{parse_rows, RowScope, TableRow};
use crate::extractors::page_url;
use crate::symbols::Symbol;
use crate::utils::error::{BrowserError, ExtractError};

const PAGE_PATH: &str = "/companies-listing/corporate-filings-announcements";
const TABLE_SELECTOR: &str = "#table-CFanncEquity";
const MIN_CELLS: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub subject: String,
    pub details: String,
    pub link: String, // Empty when the attachment cell has no anchor
    #[serde(alias = "board_cast_date_n_time")]
    pub broadcast_date_time: String,
}

pub fn announcements_url(base_url: &str, symbol: &Symbol) -> Result<Url, ExtractError> {
    page_url(base_url, PAGE_PATH, symbol, false)
}

/// One body row; short rows yield `None`.
pub fn parse_announcement_row(row: &TableRow) -> Option<Announcement> {
    if row.cells.len() < MIN_CELLS {
        tracing::info!("Skipping row with insufficient columns: {}", row.html.trim());
        return None;
    }

    Some(Announcement {
        subject: row.cells[2].text.clone(),
        details: row.cells[3].text.clone(),
        link: row.cells[4].href.clone().unwrap_or_default(),
        broadcast_date_time: row.cells[5].text.clone(),
    })
}

/// Turns the table body's rows into announcements; the first row is skipped.
pub fn collect_announcement_rows(
    symbol: &Symbol,
    rows: &[TableRow],
) -> Result<Vec<Announcement>, ExtractError> {
    if rows.len() <= 1 {
        tracing::warn!("No announcements found for symbol {}", symbol);
        return Err(ExtractError::NoRows(symbol.to_string()));
    }

    Ok(rows.iter().skip(1).filter_map(parse_announcement_row).collect())
}

/// Drives the announcements page and reads the equity announcements table.
pub async fn extract_announcements<S: BrowserSession>(
    session: &mut S,
    symbol: &Symbol,
    base_url: &str,
    timings: &Timings,
) -> Result<Vec<Announcement>, ExtractError> {
    let url = announcements_url(base_url, symbol)?;
    session.goto(url.as_str()).await?;
    tracing::info!("Visited {}", url);

    tokio::time::sleep(timings.table_settle).await;

    session
        .wait_for(TABLE_SELECTOR, WaitCondition::Present, timings.announcement_timeout)
        .await?;
    let html = session.outer_html(TABLE_SELECTOR).await?;
    let page = Url::parse(&session.current_url().await?).unwrap_or(url);

    let rows = parse_rows(&html, RowScope::FirstBody, Some(&page))
        .ok_or_else(|| BrowserError::ElementNotFound(format!("{} tbody", TABLE_SELECTOR)))?;
    tracing::info!("Found {} rows in the table for {}", rows.len(), symbol);

    let records = collect_announcement_rows(symbol, &rows)?;
    tracing::info!("Found {} announcements for symbol {}", records.len(), symbol);
    Ok(records)
}
