// src/runner/retry.rs
use std::fmt::Display;
use std::future::Future;

/// Runs `attempt_fn` until it succeeds or `max_retries` attempts have failed.
///
/// The closure gets the 1-based attempt number. Every failure is logged and
/// treated the same; after the last one the wrapper gives up and returns
/// `None` instead of propagating the error. No backoff between attempts.
pub async fn with_retries<T, E, F, Fut>(
    label: &str,
    symbol: &str,
    max_retries: u32,
    mut attempt_fn: F,
) -> Option<T>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = max_retries.max(1);

    for attempt in 1..=max_attempts {
        tracing::info!("Attempt {} for symbol {} while extracting {}", attempt, symbol, label);
        match attempt_fn(attempt).await {
            Ok(value) => return Some(value),
            Err(e) => {
                tracing::warn!(
                    "Error on attempt {} for symbol {} while extracting {}: {}",
                    attempt,
                    symbol,
                    label,
                    e
                );
                if attempt < max_attempts {
                    tracing::info!("Retrying symbol {} while extracting {}", symbol, label);
                }
            }
        }
    }

    tracing::error!(
        "Max retries reached for symbol {} while extracting {}. Giving up.",
        symbol,
        label
    );
    None
}
