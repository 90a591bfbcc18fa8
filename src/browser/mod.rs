// src/browser/mod.rs
pub mod chrome;
#[cfg(test)]
pub mod mock;

use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use crate::utils::error::BrowserError;

pub use chrome::{ChromeFactory, ChromeOptions};

/// What "ready" means for an element we wait on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    /// Attached to the DOM.
    Present,
    /// Attached, rendered and not disabled.
    Clickable,
}

impl WaitCondition {
    pub fn label(self) -> &'static str {
        match self {
            WaitCondition::Present => "present",
            WaitCondition::Clickable => "clickable",
        }
    }
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One isolated browser, driven through a single page.
///
/// All selectors are CSS selectors. Implementations must be usable across
/// `.await` points on a multi-threaded runtime, hence `Send`.
#[async_trait]
pub trait BrowserSession: Send {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError>;

    /// URL of the driven page after redirects.
    async fn current_url(&mut self) -> Result<String, BrowserError>;

    /// Polls until `selector` satisfies `condition`, failing with
    /// [`BrowserError::Timeout`] once `timeout` elapses.
    async fn wait_for(
        &mut self,
        selector: &str,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Current `value` property of an input.
    async fn value(&mut self, selector: &str) -> Result<String, BrowserError>;

    /// Overwrites the `value` property directly, without key events.
    async fn set_value(&mut self, selector: &str, value: &str) -> Result<(), BrowserError>;

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError>;

    async fn outer_html(&mut self, selector: &str) -> Result<String, BrowserError>;

    /// Serialized DOM of the whole page.
    async fn content(&mut self) -> Result<String, BrowserError>;

    /// URLs of tabs other than the driven page, oldest first.
    async fn other_tab_urls(&mut self) -> Result<Vec<String>, BrowserError>;

    /// Terminates the browser. Called exactly once, on every exit path.
    async fn close(self) -> Result<(), BrowserError>
    where
        Self: Sized;
}

/// Creates one fresh session per routine invocation.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: BrowserSession + 'static;

    async fn create_session(&self) -> Result<Self::Session, BrowserError>;
}

/// Sleeps `interval` between calls to `probe` until it reports ready or
/// `timeout` has elapsed. Shared by implementations of [`BrowserSession::wait_for`].
pub async fn poll_until<F, Fut>(
    selector: &str,
    condition: WaitCondition,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<(), BrowserError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<bool, BrowserError>>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if probe().await? {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(BrowserError::Timeout {
                selector: selector.to_string(),
                condition: condition.label(),
                waited: timeout,
            });
        }
        tokio::time::sleep(interval).await;
    }
}
