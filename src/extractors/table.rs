// src/extractors/table.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

// --- CSS Selectors (Lazy Static) ---
static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr").expect("Failed to compile ROW_SELECTOR")
});

static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("td").expect("Failed to compile CELL_SELECTOR")
});

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a").expect("Failed to compile ANCHOR_SELECTOR")
});

static TBODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tbody").expect("Failed to compile TBODY_SELECTOR")
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE")
});

// --- Data Structures ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,         // Whitespace-normalized visible text
    pub has_anchor: bool,     // Whether the cell holds an `a` element at all
    pub href: Option<String>, // First anchor's href, resolved against the page URL
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    pub html: String, // Inner HTML, kept for skip/failure logs
}

/// Which rows of the container to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowScope {
    /// Every `tr` under the container, header included.
    All,
    /// Only the `tr`s of the container's first `tbody`.
    FirstBody,
}

/// Parses the rows of a table container's outer HTML.
///
/// Returns `None` when `scope` asks for a `tbody` the fragment doesn't have.
pub fn parse_rows(
    container_html: &str,
    scope: RowScope,
    page_url: Option<&Url>,
) -> Option<Vec<TableRow>> {
    let fragment = Html::parse_fragment(container_html);
    let root = fragment.root_element();

    let rows_root = match scope {
        RowScope::All => root,
        RowScope::FirstBody => root.select(&TBODY_SELECTOR).next()?,
    };

    Some(rows_root.select(&ROW_SELECTOR).map(|row| parse_row(row, page_url)).collect())
}

fn parse_row(row: ElementRef<'_>, page_url: Option<&Url>) -> TableRow {
    let cells = row
        .select(&CELL_SELECTOR)
        .map(|td| {
            let anchor = td.select(&ANCHOR_SELECTOR).next();
            TableCell {
                text: normalize_text(&td.text().collect::<String>()),
                has_anchor: anchor.is_some(),
                href: anchor
                    .and_then(|a| a.value().attr("href"))
                    .map(|href| resolve_href(href, page_url)),
            }
        })
        .collect();

    TableRow { cells, html: row.inner_html() }
}

/// Collapses runs of whitespace (including `&nbsp;`) and trims.
pub fn normalize_text(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw.replace('\u{a0}', " ").trim(), " ").into_owned()
}

fn resolve_href(href: &str, page_url: Option<&Url>) -> String {
    match page_url.map(|base| base.join(href.trim())) {
        Some(Ok(resolved)) => resolved.to_string(),
        _ => href.trim().to_string(),
    }
}
