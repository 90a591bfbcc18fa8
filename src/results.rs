// src/results.rs
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use crate::extractors::{AnnualReport, Announcement, Filing};
use crate::symbols::Symbol;

/// Symbol-keyed results of one report type, shared by the workers of a pool.
///
/// Each symbol is written by exactly one task; the mutex only makes inserts
/// of different keys from different tasks safe.
#[derive(Debug)]
pub struct ResultMap<T> {
    inner: Mutex<BTreeMap<Symbol, T>>,
}

impl<T> Default for ResultMap<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(BTreeMap::new()),
        }
    }
}

impl<T: Clone> ResultMap<T> {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, symbol: Symbol, value: T) {
        self.lock().insert(symbol, value);
    }

    #[cfg(test)]
    pub fn get(&self, symbol: &Symbol) -> Option<T> {
        self.lock().get(symbol).cloned()
    }

    #[cfg(test)]
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.lock().contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point-in-time copy, sorted by symbol.
    pub fn snapshot(&self) -> BTreeMap<Symbol, T> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<Symbol, T>> {
        // A poisoned map still holds complete entries; a panicking writer
        // can't leave a half-inserted key behind.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// The three result maps of a run.
#[derive(Debug, Default)]
pub struct Collected {
    pub brsr: ResultMap<String>,
    pub annual: ResultMap<Vec<AnnualReport>>,
    pub announcements: ResultMap<Vec<Announcement>>,
}

impl Collected {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a successful routine's output. A BRSR run that opened no tab
    /// leaves the symbol out, same as a failure. So does an annual-report
    /// table whose rows held no report; announcements are kept even when empty.
    pub fn record(&self, symbol: Symbol, filing: Filing) {
        match filing {
            Filing::Brsr(Some(url)) => self.brsr.insert(symbol, url),
            Filing::Brsr(None) => {}
            Filing::Annual(reports) if reports.is_empty() => {
                tracing::info!("No annual reports listed for {}", symbol);
            }
            Filing::Annual(reports) => self.annual.insert(symbol, reports),
            Filing::Announcements(records) => self.announcements.insert(symbol, records),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.brsr.is_empty() && self.annual.is_empty() && self.announcements.is_empty()
    }
}
