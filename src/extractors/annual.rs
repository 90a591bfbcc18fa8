// src/extractors/annual.rs
use serde::{Deserialize, Serialize};
use url::Url;
use crate::browser::{BrowserSession, WaitCondition};
use crate::config::Timings;
use crate::extractors::table::{parse_rows, RowScope, TableRow};
use crate::extractors::page_url;
use crate::symbols::Symbol;
use crate::utils::error::ExtractError;

const PAGE_PATH: &str = "/companies-listing/corporate-filings-annual-reports";
const WRAPPER_SELECTOR: &str = "#AREquityWrapper";
const EXPECTED_CELLS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualReport {
    pub from_year: String,
    pub to_year: String,
    pub link: Option<String>, // `null` when the anchor carries no href
}

pub fn annual_reports_url(base_url: &str, symbol: &Symbol) -> Result<Url, ExtractError> {
    page_url(base_url, PAGE_PATH, symbol, true)
}

/// One data row: `Ok(None)` when the row isn't a 4-cell report row.
pub fn parse_annual_row(
    symbol: &Symbol,
    index: usize,
    row: &TableRow,
) -> Result<Option<AnnualReport>, ExtractError> {
    if row.cells.len() != EXPECTED_CELLS {
        tracing::warn!(
            "Row {} in symbol {} does not have {} <td> elements ({} found)",
            index,
            symbol,
            EXPECTED_CELLS,
            row.cells.len()
        );
        return Ok(None);
    }

    let name = &row.cells[0].text;
    let from_year = row.cells[1].text.clone();
    let to_year = row.cells[2].text.clone();
    let attachment = &row.cells[3];
    if !attachment.has_anchor {
        return Err(ExtractError::RowProcessing {
            row: index,
            reason: format!("no anchor in attachment cell: {}", row.html.trim()),
        });
    }
    let link = attachment.href.clone();

    tracing::info!(
        "Symbol: {}, Report Name: {}, From Year: {}, To Year: {}, Link: {}",
        symbol,
        name,
        from_year,
        to_year,
        link.as_deref().unwrap_or("None")
    );
    Ok(Some(AnnualReport { from_year, to_year, link }))
}

/// Turns the wrapper's rows (header first) into reports, in row order.
pub fn collect_annual_rows(
    symbol: &Symbol,
    rows: &[TableRow],
) -> Result<Vec<AnnualReport>, ExtractError> {
    if rows.len() <= 1 {
        tracing::warn!("No data rows found for symbol {}.", symbol);
        return Err(ExtractError::NoRows(symbol.to_string()));
    }

    let mut reports = Vec::new();
    for (index, row) in rows.iter().enumerate().skip(1) {
        if let Some(report) = parse_annual_row(symbol, index, row)? {
            reports.push(report);
        }
    }
    Ok(reports)
}

/// Drives an annual-reports page and reads the equity wrapper's table.
pub async fn extract_annual_reports<S: BrowserSession>(
    session: &mut S,
    symbol: &Symbol,
    base_url: &str,
    timings: &Timings,
) -> Result<Vec<AnnualReport>, ExtractError> {
    let url = annual_reports_url(base_url, symbol)?;
    session.goto(url.as_str()).await?;
    tracing::info!("Visited {}", url);

    // The wrapper is in the initial markup; its rows arrive later with no marker.
    tokio::time::sleep(timings.table_settle).await;

    session.wait_for(WRAPPER_SELECTOR, WaitCondition::Present, timings.wait_timeout).await?;
    let html = session.outer_html(WRAPPER_SELECTOR).await?;
    let page = Url::parse(&session.current_url().await?).unwrap_or(url);

    let rows = parse_rows(&html, RowScope::All, Some(&page)).unwrap_or_default();
    tracing::debug!("Found {} rows in {} for {}", rows.len(), WRAPPER_SELECTOR, symbol);

    collect_annual_rows(symbol, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock::{MockFactory, MockPage};
    use crate::browser::SessionFactory;
    use crate::extractors::table::TableCell;

    const BASE: &str = "https://www.nseindia.com";
    const LINK_2023: &str = "https://x/2023.pdf";
    const LINK_2022: &str = "https://x/2022.pdf";

    fn row(cells: &[(&str, Option<&str>)]) -> TableRow {
        TableRow {
            cells: cells
                .iter()
                .map(|(text, href)| TableCell {
                    text: text.to_string(),
                    has_anchor: href.is_some(),
                    href: href.map(str::to_string),
                })
                .collect(),
            html: String::new(),
        }
    }

    fn report(from_year: &str, to_year: &str, link: &str) -> AnnualReport {
        AnnualReport {
            from_year: from_year.into(),
            to_year: to_year.into(),
            link: Some(link.into()),
        }
    }

    fn header() -> TableRow {
        row(&[])
    }

    #[test]
    fn test_only_four_cell_rows_become_reports_in_order() {
        let symbol = Symbol::new("INFY");
        let rows = vec![
            header(),
            row(&[("Infosys", None), ("2022", None), ("2023", None), ("PDF", Some(LINK_2023))]),
            row(&[("Total", None), ("2", None)]),
            row(&[("Infosys", None), ("2021", None), ("2022", None), ("PDF", Some(LINK_2022))]),
            row(&[("a", None), ("b", None), ("c", None), ("d", None), ("e", None)]),
        ];

        let reports = collect_annual_rows(&symbol, &rows).unwrap();
        assert_eq!(
            reports,
            vec![
                report("2022", "2023", LINK_2023),
                report("2021", "2022", LINK_2022),
            ]
        );
    }

    #[test]
    fn test_placeholder_row_yields_no_reports() {
        let symbol = Symbol::new("NODATA");
        let rows = vec![header(), row(&[("No Records Found", None)])];
        let reports = tokio_test::assert_ok!(collect_annual_rows(&symbol, &rows));
        assert!(reports.is_empty());
    }

    #[test]
    fn test_header_only_table_fails() {
        let symbol = Symbol::new("INFY");
        assert!(matches!(collect_annual_rows(&symbol, &[header()]), Err(ExtractError::NoRows(_))));
        assert!(matches!(collect_annual_rows(&symbol, &[]), Err(ExtractError::NoRows(_))));
    }

    #[test]
    fn test_four_cell_row_without_anchor_fails_the_table() {
        let symbol = Symbol::new("INFY");
        let rows = vec![
            header(),
            row(&[("Infosys", None), ("2022", None), ("2023", None), ("-", None)]),
        ];
        match collect_annual_rows(&symbol, &rows) {
            Err(ExtractError::RowProcessing { row, .. }) => assert_eq!(row, 1),
            other => panic!("expected row failure, got {:?}", other),
        }
    }

    #[test]
    fn test_anchor_without_href_records_null_link() {
        let html = "<table><tr><th>Company</th></tr>\
                    <tr><td>Infosys</td><td>2022</td><td>2023</td><td><a>pdf</a></td></tr></table>";
        let rows = parse_rows(html, RowScope::All, None).unwrap();

        let reports = tokio_test::assert_ok!(collect_annual_rows(&Symbol::new("INFY"), &rows));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].link, None);
        assert_eq!(reports[0].from_year, "2022");

        let json = serde_json::to_string(&reports[0]).unwrap();
        assert_eq!(json, r#"{"from_year":"2022","to_year":"2023","link":null}"#);
    }

    #[test]
    fn test_url_encodes_symbol() {
        let url = annual_reports_url("https://www.nseindia.com", &Symbol::new("M&M")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.nseindia.com/companies-listing/corporate-filings-annual-reports\
             ?symbol=M%26M&tabIndex=equity"
        );
    }

    #[tokio::test]
    async fn test_extract_reads_wrapper_table() {
        let html = r#"<div id="AREquityWrapper"><table>
            <tr><th>Company Name</th><th>From Year</th><th>To Year</th><th>Attachment</th></tr>
            <tr><td>Wipro Ltd</td><td>2023</td><td>2024</td>
                <td><a href="/docs/wipro_ar_2024.pdf">pdf</a></td></tr>
            </table></div>"#;
        let factory = MockFactory::new()
            .with_page("WIPRO", MockPage::new().with_html(WRAPPER_SELECTOR, html));
        let timings = Timings {
            table_settle: std::time::Duration::ZERO,
            ..Timings::default()
        };

        let mut session = factory.create_session().await.unwrap();
        let reports = extract_annual_reports(&mut session, &Symbol::new("WIPRO"), BASE, &timings)
            .await
            .expect("extraction should succeed");

        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0].link.as_deref(),
            Some("https://www.nseindia.com/docs/wipro_ar_2024.pdf")
        );
        assert_eq!(reports[0].from_year, "2023");
    }

    #[tokio::test]
    async fn test_missing_wrapper_is_an_error() {
        let factory = MockFactory::new().with_page("WIPRO", MockPage::new());
        let timings = Timings {
            table_settle: std::time::Duration::ZERO,
            ..Timings::default()
        };

        let mut session = factory.create_session().await.unwrap();
        let result =
            extract_annual_reports(&mut session, &Symbol::new("WIPRO"), BASE, &timings).await;
        assert!(matches!(result, Err(ExtractError::Browser(_))), "got {:?}", result);
    }
}
