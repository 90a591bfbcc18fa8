// src/browser/chrome.rs
use std::path::PathBuf;
use std::time::Duration;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use crate::browser::{poll_until, BrowserSession, SessionFactory, WaitCondition};
use crate::utils::error::BrowserError;

/// Launch options shared by every session of a run.
#[derive(Debug, Clone)]
pub struct ChromeOptions {
    pub headless: bool,
    pub executable: Option<PathBuf>,
    pub window_size: (u32, u32),
    pub poll_interval: Duration,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            headless: false,
            executable: None,
            window_size: (1366, 900),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Launches a separate Chrome process for each session.
pub struct ChromeFactory {
    options: ChromeOptions,
}

impl ChromeFactory {
    pub fn new(options: ChromeOptions) -> Self {
        Self { options }
    }

    fn browser_config(&self) -> Result<BrowserConfig, BrowserError> {
        let (width, height) = self.options.window_size;
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .window_size(width, height);

        if !self.options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.options.executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(BrowserError::Launch)
    }
}

#[async_trait]
impl SessionFactory for ChromeFactory {
    type Session = ChromeSession;

    async fn create_session(&self) -> Result<ChromeSession, BrowserError> {
        let (browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The handler stream drives all CDP traffic and must be polled for the
        // lifetime of the browser.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(e.into());
            }
        };

        tracing::debug!("Launched browser session (headless: {})", self.options.headless);

        Ok(ChromeSession {
            browser,
            page,
            handler: handler_task,
            poll_interval: self.options.poll_interval,
        })
    }
}

/// A launched Chrome plus the page the routines drive.
///
/// Dropping the session without [`BrowserSession::close`] still tears it
/// down: the handler task is aborted and chromiumoxide kills the child.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    poll_interval: Duration,
}

impl ChromeSession {
    async fn eval<T: serde::de::DeserializeOwned>(
        &self,
        script: String,
    ) -> Result<T, BrowserError> {
        self.page
            .evaluate(script)
            .await?
            .into_value::<T>()
            .map_err(|e| BrowserError::Script(e.to_string()))
    }
}

/// Quotes a Rust string as a JS string literal.
fn js_str(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn readiness_script(selector: &str, condition: WaitCondition) -> String {
    match condition {
        WaitCondition::Present => format!("document.querySelector({}) !== null", js_str(selector)),
        WaitCondition::Clickable => format!(
            "(() => {{ const el = document.querySelector({}); \
             if (!el) return false; \
             const r = el.getBoundingClientRect(); \
             return r.width > 0 && r.height > 0 && !el.disabled; }})()",
            js_str(selector)
        ),
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        self.page.goto(url).await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String, BrowserError> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn wait_for(
        &mut self,
        selector: &str,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let script = readiness_script(selector, condition);
        let interval = self.poll_interval;
        let this = &*self;
        poll_until(selector, condition, timeout, interval, || {
            this.eval::<bool>(script.clone())
        })
        .await
    }

    async fn value(&mut self, selector: &str) -> Result<String, BrowserError> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); \
             return el ? (el.value ?? '') : null; }})()",
            js_str(selector)
        );
        self.eval::<Option<String>>(script)
            .await?
            .ok_or_else(|| BrowserError::ElementNotFound(selector.to_string()))
    }

    async fn set_value(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); \
             if (!el) return false; el.value = {}; return true; }})()",
            js_str(selector),
            js_str(value)
        );
        if self.eval::<bool>(script).await? {
            Ok(())
        } else {
            Err(BrowserError::ElementNotFound(selector.to_string()))
        }
    }

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::ElementNotFound(selector.to_string()))?;
        element.click().await?;
        Ok(())
    }

    async fn outer_html(&mut self, selector: &str) -> Result<String, BrowserError> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); \
             return el ? el.outerHTML : null; }})()",
            js_str(selector)
        );
        self.eval::<Option<String>>(script)
            .await?
            .ok_or_else(|| BrowserError::ElementNotFound(selector.to_string()))
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        Ok(self.page.content().await?)
    }

    async fn other_tab_urls(&mut self) -> Result<Vec<String>, BrowserError> {
        let main = self.page.target_id().clone();
        let mut urls = Vec::new();
        for page in self.browser.pages().await? {
            if *page.target_id() == main {
                continue;
            }
            urls.push(page.url().await?.unwrap_or_default());
        }
        Ok(urls)
    }

    async fn close(mut self) -> Result<(), BrowserError> {
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Waiting for browser exit failed: {}", e);
        }
        self.handler.abort();
        closed?;
        Ok(())
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
