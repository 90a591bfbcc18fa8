// src/browser/mock.rs
//! Scripted in-memory browser for exercising the routines without Chrome.
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use crate::browser::{BrowserSession, SessionFactory, WaitCondition};
use crate::utils::error::BrowserError;

#[derive(Debug, Clone, Default)]
pub struct MockElement {
    pub value: String,
    pub html: String,
    pub clickable: bool,
}

/// What a symbol's page looks like, keyed by the `symbol` query parameter.
#[derive(Debug, Clone, Default)]
pub struct MockPage {
    pub elements: HashMap<String, MockElement>,
    /// Clicking the selector opens one tab per entry. A tab reports each URL
    /// of its chain on successive polls and then stays on the last one.
    pub opens_tabs: HashMap<String, Vec<Vec<String>>>,
    /// Navigations that fail before one succeeds.
    pub failing_visits: u32,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, selector: &str, element: MockElement) -> Self {
        self.elements.insert(selector.to_string(), element);
        self
    }

    pub fn with_html(self, selector: &str, html: &str) -> Self {
        let element = MockElement {
            html: html.to_string(),
            clickable: true,
            ..Default::default()
        };
        self.with_element(selector, element)
    }

    pub fn with_tab_on_click(self, selector: &str, url: &str) -> Self {
        self.with_redirecting_tab_on_click(selector, &[url])
    }

    pub fn with_redirecting_tab_on_click(mut self, selector: &str, chain: &[&str]) -> Self {
        let chain = chain.iter().map(|url| url.to_string()).collect();
        self.opens_tabs.entry(selector.to_string()).or_default().push(chain);
        self
    }

    pub fn failing_first(mut self, visits: u32) -> Self {
        self.failing_visits = visits;
        self
    }
}

#[derive(Debug, Default)]
pub struct MockSite {
    pages: Mutex<HashMap<String, MockPage>>,
    visits: Mutex<HashMap<String, u32>>,
    writes: Mutex<Vec<(String, String, String)>>,
    opened: AtomicU32,
    closed: AtomicU32,
}

impl MockSite {
    pub fn visits(&self, symbol: &str) -> u32 {
        self.visits.lock().unwrap().get(symbol).copied().unwrap_or(0)
    }

    /// `(symbol, selector, value)` for every `set_value` call.
    pub fn writes(&self) -> Vec<(String, String, String)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn opened(&self) -> u32 {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> u32 {
        self.closed.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockFactory {
    pub site: Arc<MockSite>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, symbol: &str, page: MockPage) -> Self {
        self.site.pages.lock().unwrap().insert(symbol.to_string(), page);
        self
    }
}

#[async_trait]
impl SessionFactory for MockFactory {
    type Session = MockSession;

    async fn create_session(&self) -> Result<MockSession, BrowserError> {
        self.site.opened.fetch_add(1, Ordering::SeqCst);
        Ok(MockSession {
            site: Arc::clone(&self.site),
            symbol: String::new(),
            url: "about:blank".to_string(),
            page: MockPage::default(),
            tabs: Vec::new(),
        })
    }
}

pub struct MockSession {
    site: Arc<MockSite>,
    symbol: String,
    url: String,
    page: MockPage,
    tabs: Vec<VecDeque<String>>,
}

impl MockSession {
    fn element(&self, selector: &str) -> Result<&MockElement, BrowserError> {
        self.page
            .elements
            .get(selector)
            .ok_or_else(|| BrowserError::ElementNotFound(selector.to_string()))
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        let parsed = url::Url::parse(url).map_err(|e| BrowserError::Script(e.to_string()))?;
        let symbol = parsed
            .query_pairs()
            .find(|(k, _)| k == "symbol")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();

        let visit = {
            let mut visits = self.site.visits.lock().unwrap();
            let n = visits.entry(symbol.clone()).or_insert(0);
            *n += 1;
            *n
        };

        let page = self.site.pages.lock().unwrap().get(&symbol).cloned().unwrap_or_default();
        if visit <= page.failing_visits {
            let reason = format!("mock navigation failure {} for {}", visit, symbol);
            return Err(BrowserError::Script(reason));
        }

        self.symbol = symbol;
        self.url = url.to_string();
        self.page = page;
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String, BrowserError> {
        Ok(self.url.clone())
    }

    async fn wait_for(
        &mut self,
        selector: &str,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let ready = match self.page.elements.get(selector) {
            Some(el) => condition == WaitCondition::Present || el.clickable,
            None => false,
        };
        if ready {
            Ok(())
        } else {
            Err(BrowserError::Timeout {
                selector: selector.to_string(),
                condition: condition.label(),
                waited: timeout,
            })
        }
    }

    async fn value(&mut self, selector: &str) -> Result<String, BrowserError> {
        Ok(self.element(selector)?.value.clone())
    }

    async fn set_value(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        self.element(selector)?;
        if let Some(el) = self.page.elements.get_mut(selector) {
            el.value = value.to_string();
        }
        self.site
            .writes
            .lock()
            .unwrap()
            .push((self.symbol.clone(), selector.to_string(), value.to_string()));
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        self.element(selector)?;
        if let Some(chains) = self.page.opens_tabs.get(selector) {
            self.tabs.extend(chains.iter().cloned().map(VecDeque::from));
        }
        Ok(())
    }

    async fn outer_html(&mut self, selector: &str) -> Result<String, BrowserError> {
        Ok(self.element(selector)?.html.clone())
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        let body: String = self.page.elements.values().map(|el| el.html.as_str()).collect();
        Ok(format!("<html><body>{}</body></html>", body))
    }

    async fn other_tab_urls(&mut self) -> Result<Vec<String>, BrowserError> {
        let mut urls = Vec::new();
        for chain in &mut self.tabs {
            let url = if chain.len() > 1 { chain.pop_front() } else { chain.front().cloned() };
            urls.extend(url);
        }
        Ok(urls)
    }

    async fn close(self) -> Result<(), BrowserError> {
        self.site.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
