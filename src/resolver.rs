//! Aggregator link → publisher link resolution.
//!
//! Feed items point at `news.google.com` redirectors. Resolution follows
//! exactly one hop: either the redirector carries the target in a `url=`
//! parameter, or a HEAD request answers with a `Location` header. Links that
//! are not aggregator links are returned untouched without any request.

use crate::error::NewsError;
use crate::http::{Transport, random_user_agent};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument, warn};
use url::Url;

static AGGREGATOR_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://(www\.)?news\.google\.com(/|\?|$)").expect("valid aggregator regex")
});

/// `true` if `link` points at the aggregator rather than a publisher.
pub fn is_aggregator_link(link: &str) -> bool {
    AGGREGATOR_LINK.is_match(link.trim())
}

/// Publisher URL carried in a `url=` query parameter, if any.
fn embedded_target(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == "url")
        .and_then(|(_, v)| Url::parse(&v).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(|u| u.to_string())
}

/// Resolves aggregator links through a shared [`Transport`].
///
/// Holds only shared references, so one resolver can serve many concurrent
/// resolutions.
#[derive(Debug)]
pub struct LinkResolver<'a, T> {
    transport: &'a T,
    user_agent: Option<&'a str>,
}

impl<'a, T: Transport> LinkResolver<'a, T> {
    /// `user_agent` overrides the random browser agent.
    pub fn new(transport: &'a T, user_agent: Option<&'a str>) -> Self {
        Self {
            transport,
            user_agent,
        }
    }

    /// Resolve `link` to its canonical publisher URL.
    ///
    /// # Errors
    ///
    /// - [`NewsError::RequestBuild`] if an aggregator link is not a valid URL
    /// - [`NewsError::Transport`] if the HEAD request fails
    /// - [`NewsError::NoRedirect`] if the response carries no redirect
    /// - [`NewsError::Parse`] if the `Location` value cannot be joined to a URL
    #[instrument(level = "debug", skip_all, fields(%link))]
    pub async fn resolve(&self, link: &str) -> Result<String, NewsError> {
        if !is_aggregator_link(link) {
            return Ok(link.to_string());
        }

        let url = Url::parse(link.trim())?;
        if let Some(target) = embedded_target(&url) {
            debug!(%target, "Resolved from embedded url parameter");
            return Ok(target);
        }

        let user_agent = self.user_agent.unwrap_or_else(|| random_user_agent());
        let resp = self.transport.head(&url, user_agent).await?;

        match resp.location.as_deref() {
            Some(location) if resp.is_redirect() => {
                let target = url
                    .join(location)
                    .map_err(|e| NewsError::Parse(format!("bad Location header '{location}': {e}")))?;
                debug!(%target, status = resp.status, "Resolved via redirect");
                Ok(target.to_string())
            }
            _ => {
                warn!(status = resp.status, "Aggregator link did not redirect");
                Err(NewsError::NoRedirect {
                    link: link.to_string(),
                })
            }
        }
    }
}
