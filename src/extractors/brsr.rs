// src/extractors/brsr.rs
use chrono::{Days, Months, NaiveDate};
use url::Url;
use crate::browser::{BrowserSession, WaitCondition};
use crate::config::Timings;
use crate::extractors::page_url;
use crate::symbols::Symbol;
use crate::utils::error::{BrowserError, ExtractError};

const PAGE_PATH: &str = "/companies-listing/corporate-filings-bussiness-sustainabilitiy-reports";
const COMPANY_INPUT_SELECTOR: &str = "input[placeholder='Company Name']";
const FILTER_BUTTON_SELECTOR: &str = "button[class*='filterbtn']";
const DOWNLOAD_SELECTOR: &str = "#CFBussinessSustainabilitiy-download";
/// Earliest date the filter accepts; widens the search to every filing.
const EPOCH_FROM_DATE: &str = "01-01-1980";

pub fn brsr_url(base_url: &str, symbol: &Symbol) -> Result<Url, ExtractError> {
    page_url(base_url, PAGE_PATH, symbol, true)
}

/// The page preselects a one-year window starting the day after today's
/// date last year, and tags the "from" input with it as `data-fromdate`.
pub fn default_from_date(today: NaiveDate) -> String {
    let last_year = today.checked_sub_months(Months::new(12)).unwrap_or(today);
    last_year
        .checked_add_days(Days::new(1))
        .unwrap_or(last_year)
        .format("%d-%m-%Y")
        .to_string()
}

fn from_date_selector(today: NaiveDate) -> String {
    format!("input[data-fromdate='{}']", default_from_date(today))
}

/// Drives the sustainability-report filter and returns the URL the download
/// control opens, or `None` when no new tab appears.
pub async fn extract_brsr_report<S: BrowserSession>(
    session: &mut S,
    symbol: &Symbol,
    base_url: &str,
    timings: &Timings,
    today: NaiveDate,
) -> Result<Option<String>, ExtractError> {
    let url = brsr_url(base_url, symbol)?;
    session.goto(url.as_str()).await?;
    tracing::info!("Visited {}", url);

    let from_date = from_date_selector(today);
    session.wait_for(&from_date, WaitCondition::Present, timings.wait_timeout).await?;
    session.set_value(&from_date, EPOCH_FROM_DATE).await?;
    tracing::info!("Set from-date for symbol {}", symbol);

    session.wait_for(COMPANY_INPUT_SELECTOR, WaitCondition::Present, timings.wait_timeout).await?;
    let existing = session.value(COMPANY_INPUT_SELECTOR).await?;
    if existing.is_empty() {
        session.set_value(COMPANY_INPUT_SELECTOR, symbol.as_str()).await?;
        tracing::info!("Set 'Company Name' input to {}", symbol);
    } else {
        tracing::info!("'Company Name' input already has value: {}", existing);
    }

    session.wait_for(FILTER_BUTTON_SELECTOR, WaitCondition::Clickable, timings.wait_timeout).await?;
    session.click(FILTER_BUTTON_SELECTOR).await?;
    tracing::info!("Clicked filter button for symbol {}", symbol);

    // The download control is present before and after filtering, so its
    // presence says nothing about the results having refreshed.
    tokio::time::sleep(timings.brsr_render_pause).await;

    session.wait_for(DOWNLOAD_SELECTOR, WaitCondition::Present, timings.wait_timeout).await?;
    session.click(DOWNLOAD_SELECTOR).await?;

    match wait_for_new_tab(session, timings).await? {
        Some(redirected) => {
            tracing::info!("Redirected URL for {}: {}", symbol, redirected);
            Ok(Some(redirected))
        }
        None => {
            tracing::warn!("No new tab opened for {}", symbol);
            Ok(None)
        }
    }
}

/// Polls for a second tab with a real URL and waits for it to settle: the
/// download link goes through script-driven redirects, so a URL counts once
/// two consecutive polls agree. At the deadline the last URL seen is returned,
/// or `None` if no tab ever opened.
async fn wait_for_new_tab<S: BrowserSession>(
    session: &mut S,
    timings: &Timings,
) -> Result<Option<String>, BrowserError> {
    let deadline = tokio::time::Instant::now() + timings.wait_timeout;
    let mut last_seen: Option<String> = None;
    loop {
        let tabs = session.other_tab_urls().await?;
        match tabs.into_iter().find(|u| !u.is_empty() && u != "about:blank") {
            Some(url) if last_seen.as_deref() == Some(url.as_str()) => return Ok(Some(url)),
            Some(url) => {
                tracing::debug!("New tab at {}", url);
                last_seen = Some(url);
            }
            None => {}
        }
        if tokio::time::Instant::now() >= deadline {
            return Ok(last_seen);
        }
        tokio::time::sleep(timings.poll_interval).await;
    }
}
