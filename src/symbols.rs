// src/symbols.rs
use std::fmt;
use std::io::Read;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::utils::error::SymbolError;

/// Ticker-like identifier of one listed company.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Loads the symbol column of a CSV file (header row required).
pub fn load_symbols<P: AsRef<Path>>(path: P, column: &str) -> Result<Vec<Symbol>, SymbolError> {
    let path = path.as_ref();
    tracing::info!("Loading symbols from {} (column '{}')", path.display(), column);

    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_symbols(file, column, &path.display().to_string())
}

fn read_symbols<R: Read>(
    reader: R,
    column: &str,
    source: &str,
) -> Result<Vec<Symbol>, SymbolError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let index = rdr
        .headers()?
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| SymbolError::MissingColumn {
            column: column.to_string(),
            path: source.to_string(),
        })?;

    let mut symbols = Vec::new();
    for record in rdr.records() {
        let record = record?;
        match record.get(index).map(str::trim) {
            Some(value) if !value.is_empty() => symbols.push(Symbol::new(value)),
            _ => {
                let line = record.position().map(|p| p.line());
                tracing::debug!("Skipping CSV line {:?} without a symbol", line);
            }
        }
    }

    tracing::info!("Loaded {} symbols from {}", symbols.len(), source);
    Ok(symbols)
}
