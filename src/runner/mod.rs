// src/runner/mod.rs
pub mod retry;

use std::future::Future;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use crate::browser::SessionFactory;
use crate::config::{ReportKind, RunConfig};
use crate::extractors::run_routine;
use crate::results::Collected;
use crate::symbols::Symbol;

pub use retry::with_retries;

/// Runs `task` over `symbols` with at most `workers` in flight.
pub async fn run_pool<'a, F, Fut>(symbols: &'a [Symbol], workers: usize, task: F)
where
    F: Fn(&'a Symbol) -> Fut,
    Fut: Future<Output = ()>,
{
    stream::iter(symbols)
        .for_each_concurrent(workers.max(1), task)
        .await;
}

/// Collects every configured report type, one pool per type, in order.
///
/// Failures never escape: a symbol whose routine keeps failing is simply
/// missing from its map.
pub async fn collect_filings<F: SessionFactory>(
    factory: &F,
    symbols: &[Symbol],
    config: &RunConfig,
    today: NaiveDate,
) -> Collected {
    let collected = Collected::new();

    for kind in ReportKind::ALL {
        if !config.runs(kind) {
            tracing::debug!("Skipping {} (not requested)", kind);
            continue;
        }

        let limit = config.limits.for_kind(kind).min(symbols.len());
        let batch = &symbols[..limit];
        tracing::info!(
            "Extracting {} for {} symbols with {} worker(s)",
            kind,
            batch.len(),
            config.workers.max(1)
        );

        let collected = &collected;
        run_pool(batch, config.workers, |symbol| async move {
            let label = kind.to_string();
            let filing = with_retries(&label, symbol.as_str(), config.max_retries, |attempt| {
                run_routine(factory, kind, symbol, attempt, config, today)
            })
            .await;

            if let Some(filing) = filing {
                collected.record(symbol.clone(), filing);
            }
        })
        .await;

        tracing::info!("Finished {}", kind);
    }

    collected
}
