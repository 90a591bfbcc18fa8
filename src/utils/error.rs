// src/utils/error.rs
use std::time::Duration;
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("DevTools protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError), // Automatically convert CDP errors

    #[error("Timed out after {waited:?} waiting for '{selector}' to be {condition}")]
    Timeout {
        selector: String,
        condition: &'static str,
        waited: Duration,
    },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Script evaluation failed: {0}")]
    Script(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Browser interaction failed: {0}")]
    Browser(#[from] BrowserError),

    #[error("No data rows found for symbol {0}")]
    NoRows(String),

    #[error("Failed to process row {row}: {reason}")]
    RowProcessing { row: usize, reason: String },

    #[error("Invalid page URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Error, Debug)]
pub enum SymbolError {
    #[error("Failed to read symbol file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { column: String, path: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Symbol source failed: {0}")]
    Symbols(#[from] SymbolError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
