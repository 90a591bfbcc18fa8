// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use crate::config::ReportKind;
use crate::results::{Collected, ResultMap};
use crate::utils::error::StorageError;

#[cfg(test)]
use std::collections::BTreeMap;
#[cfg(test)]
use serde::de::DeserializeOwned;
#[cfg(test)]
use crate::symbols::Symbol;

const JSON_INDENT: &[u8] = b"    ";

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn path_for(&self, kind: ReportKind) -> PathBuf {
        self.base_dir.join(format!("{}.json", kind.file_stem()))
    }

    /// Writes one result map as a JSON object keyed by symbol, indented by
    /// four spaces
    pub fn save_results<T: Serialize + Clone>(
        &self,
        kind: ReportKind,
        results: &ResultMap<T>,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.path_for(kind);

        let json = to_indented_json(&results.snapshot())?;

        fs::write(&file_path, json)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved {} entries of {} to {}", results.len(), kind, file_path.display());

        Ok(file_path)
    }

    /// Writes all three maps, each to its own file, in report order
    pub fn save_all(&self, collected: &Collected) -> Result<Vec<PathBuf>, StorageError> {
        Ok(vec![
            self.save_results(ReportKind::Brsr, &collected.brsr)?,
            self.save_results(ReportKind::Annual, &collected.annual)?,
            self.save_results(ReportKind::Announcements, &collected.announcements)?,
        ])
    }

    /// Reads back a map written by [`StorageManager::save_results`]
    #[cfg(test)]
    pub fn load_results<T: DeserializeOwned>(
        &self,
        kind: ReportKind,
    ) -> Result<BTreeMap<Symbol, T>, StorageError> {
        let file_path = self.path_for(kind);
        let json = fs::read_to_string(&file_path)
            .map_err(StorageError::IoError)?;

        serde_json::from_str(&json).map_err(|e| {
            StorageError::SerializationError(format!("{}: {}", file_path.display(), e))
        })
    }
}

fn to_indented_json<T: Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    Ok(buf)
}
