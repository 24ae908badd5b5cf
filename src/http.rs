//! HTTP transport used by every stage of the pipeline.
//!
//! The pipeline talks to the network only through [`Transport`], so the feed
//! ingestor, link resolver and content extractor can be driven by a fake in
//! tests. [`ReqwestTransport`] is the real implementation.
//!
//! # Redirects
//!
//! `head` never follows redirects: the link resolver needs to read the
//! `Location` header of the first hop. `get` follows them as usual.

use crate::error::NewsError;
use rand::{Rng, rng};
use std::future::Future;
use reqwest::header::{LOCATION, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Client, Proxy};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// Browser user agents; the aggregator rejects empty or library defaults.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.4; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
];

/// Request timeout applied by [`ReqwestTransport`] to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pick a realistic browser user agent at random.
pub fn random_user_agent() -> &'static str {
    USER_AGENTS[rng().random_range(0..USER_AGENTS.len())]
}

/// The parts of a response the pipeline cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Raw `Location` header, if any.
    pub location: Option<String>,
    /// Body text; always empty for HEAD.
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

/// Minimal async HTTP interface.
///
/// Implementations must be safe to call concurrently through `&self`.
/// Transport-level failures (DNS, connect, proxy, timeout) are reported as
/// [`NewsError::Transport`]; HTTP status codes are returned as-is for the
/// caller to judge.
///
/// The returned futures are `Send` so pipelines built on a transport can be
/// spawned onto a multi-threaded runtime. Implementors may still write the
/// methods as `async fn`.
pub trait Transport {
    /// GET `url`, following redirects, and read the body as text.
    fn get(
        &self,
        url: &Url,
        user_agent: &str,
    ) -> impl Future<Output = Result<HttpResponse, NewsError>> + Send;

    /// HEAD `url` without following redirects.
    fn head(
        &self,
        url: &Url,
        user_agent: &str,
    ) -> impl Future<Output = Result<HttpResponse, NewsError>> + Send;
}

/// [`Transport`] over `reqwest`, optionally routed through a proxy.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// Follows redirects; used for GET.
    client: Client,
    /// Never follows redirects; used for HEAD.
    no_redirect: Client,
}

impl ReqwestTransport {
    /// Build a transport. `proxy`, when set, routes every request through it.
    ///
    /// # Errors
    ///
    /// [`NewsError::RequestBuild`] if the proxy URL is invalid or the TLS
    /// backend cannot be initialised.
    pub fn new(proxy: Option<&str>) -> Result<Self, NewsError> {
        let client = Self::builder(proxy)?
            .build()
            .map_err(|e| NewsError::RequestBuild(format!("error building http client: {e}")))?;
        let no_redirect = Self::builder(proxy)?
            .redirect(Policy::none())
            .build()
            .map_err(|e| NewsError::RequestBuild(format!("error building http client: {e}")))?;
        Ok(Self {
            client,
            no_redirect,
        })
    }

    fn builder(proxy: Option<&str>) -> Result<reqwest::ClientBuilder, NewsError> {
        let mut builder = Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(proxy) = proxy {
            let proxy = Proxy::all(proxy)
                .map_err(|e| NewsError::RequestBuild(format!("error parsing proxy url: {e}")))?;
            builder = builder.proxy(proxy);
        }
        Ok(builder)
    }
}

impl Transport for ReqwestTransport {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn get(&self, url: &Url, user_agent: &str) -> Result<HttpResponse, NewsError> {
        let t0 = Instant::now();
        let resp = self
            .client
            .get(url.clone())
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| {
                warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "GET failed");
                NewsError::transport(url.as_str(), e)
            })?;

        let status = resp.status().as_u16();
        let location = header_string(&resp, LOCATION);
        let body = resp
            .text()
            .await
            .map_err(|e| NewsError::transport(url.as_str(), format!("error reading response body: {e}")))?;

        debug!(
            status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "GET completed"
        );
        Ok(HttpResponse {
            status,
            location,
            body,
        })
    }

    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn head(&self, url: &Url, user_agent: &str) -> Result<HttpResponse, NewsError> {
        let resp = self
            .no_redirect
            .head(url.clone())
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| NewsError::transport(url.as_str(), e))?;

        let status = resp.status().as_u16();
        let location = header_string(&resp, LOCATION);
        debug!(status, ?location, "HEAD completed");
        Ok(HttpResponse {
            status,
            location,
            body: String::new(),
        })
    }
}

fn header_string(resp: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
