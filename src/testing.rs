//! In-memory [`Transport`] for unit tests.
//!
//! Responses are registered per URL; every call is counted and recorded so
//! tests can assert how many requests a code path issued.

use crate::error::NewsError;
use crate::http::{HttpResponse, Transport};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

fn key(url: &str) -> String {
    Url::parse(url).map_or_else(|_| url.to_string(), |u| u.to_string())
}

#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    feed: Option<(u16, String)>,
    pages: HashMap<String, (u16, String)>,
    redirects: HashMap<String, String>,
    failing_get: HashSet<String>,
    failing_head: HashSet<String>,
    slow_head: HashMap<String, Duration>,
    slow_get: HashMap<String, Duration>,
    gets: AtomicUsize,
    heads: AtomicUsize,
    requested: Mutex<Vec<String>>,
    user_agents: Mutex<Vec<String>>,
}

impl MockTransport {
    /// Body served for any GET to the aggregator host.
    pub fn with_feed(mut self, xml: impl Into<String>) -> Self {
        self.feed = Some((200, xml.into()));
        self
    }

    pub fn with_feed_status(mut self, status: u16, body: impl Into<String>) -> Self {
        self.feed = Some((status, body.into()));
        self
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(key(url), (200, html.into()));
        self
    }

    pub fn with_page_status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(key(url), (status, String::new()));
        self
    }

    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(key(from), to.to_string());
        self
    }

    pub fn failing_get(mut self, url: &str) -> Self {
        self.failing_get.insert(key(url));
        self
    }

    pub fn failing_head(mut self, url: &str) -> Self {
        self.failing_head.insert(key(url));
        self
    }

    /// Delay the HEAD response for `url`.
    pub fn slow_head(mut self, url: &str, delay: Duration) -> Self {
        self.slow_head.insert(key(url), delay);
        self
    }

    /// Delay the GET response for `url`.
    pub fn slow_get(mut self, url: &str, delay: Duration) -> Self {
        self.slow_get.insert(key(url), delay);
        self
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn head_calls(&self) -> usize {
        self.heads.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.get_calls() + self.head_calls()
    }

    /// Every requested URL, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn last_user_agent(&self) -> Option<String> {
        self.user_agents.lock().unwrap().last().cloned()
    }

    fn record(&self, url: &Url, user_agent: &str) {
        self.requested.lock().unwrap().push(url.to_string());
        self.user_agents.lock().unwrap().push(user_agent.to_string());
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &Url, user_agent: &str) -> Result<HttpResponse, NewsError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.record(url, user_agent);
        let k = url.to_string();

        if let Some(delay) = self.slow_get.get(&k) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_get.contains(&k) {
            return Err(NewsError::transport(k, "connection refused"));
        }
        let (status, body) = if let Some(page) = self.pages.get(&k) {
            page.clone()
        } else if url.host_str() == Some("news.google.com") && self.feed.is_some() {
            self.feed.clone().unwrap_or_default()
        } else {
            (404, String::new())
        };
        Ok(HttpResponse {
            status,
            location: None,
            body,
        })
    }

    async fn head(&self, url: &Url, user_agent: &str) -> Result<HttpResponse, NewsError> {
        self.heads.fetch_add(1, Ordering::SeqCst);
        self.record(url, user_agent);
        let k = url.to_string();

        if let Some(delay) = self.slow_head.get(&k) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_head.contains(&k) {
            return Err(NewsError::transport(k, "connection reset"));
        }
        Ok(match self.redirects.get(&k) {
            Some(to) => HttpResponse {
                status: 302,
                location: Some(to.clone()),
                body: String::new(),
            },
            None => HttpResponse {
                status: 200,
                ..HttpResponse::default()
            },
        })
    }
}
