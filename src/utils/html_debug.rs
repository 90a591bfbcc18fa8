// src/utils/html_debug.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::utils::error::StorageError;

/// Saves the page HTML of a failed attempt to
/// `<base_dir>/debug/<report>/<SYMBOL>_attempt<N>.html`.
pub fn save_page_snapshot(
    base_dir: &Path,
    report: &str,
    symbol: &str,
    attempt: u32,
    html: &str,
) -> Result<PathBuf, StorageError> {
    let debug_dir = base_dir.join("debug").join(report);
    fs::create_dir_all(&debug_dir)?;

    let path = debug_dir.join(snapshot_file_name(symbol, attempt));

    // Stamp the capture time so repeated runs are distinguishable
    let mut snapshot = format!(
        "<!-- {} {} attempt {} captured {} -->\n",
        report,
        symbol,
        attempt,
        chrono::Local::now().to_rfc3339()
    );
    snapshot.push_str(html);

    fs::write(&path, snapshot)?;

    tracing::info!("Saved debug snapshot to {}", path.display());
    Ok(path)
}

/// Symbols may carry characters (`&`, `/`) that don't belong in a file name.
fn snapshot_file_name(symbol: &str, attempt: u32) -> String {
    let safe: String = symbol
        .to_uppercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}_attempt{}.html", safe, attempt)
}
