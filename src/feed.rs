//! Feed ingestion: query URL composition, retrieval and parsing.
//!
//! # URL Pattern
//!
//! ```text
//! https://news.google.com/rss?hl=en&gl=US&ceid=US%3Aen
//! https://news.google.com/rss/search?hl=en&gl=US&ceid=US%3Aen&q=rust%20when%3A7d
//! https://news.google.com/rss/headlines/section/topic/BUSINESS?hl=en&gl=US&ceid=US%3Aen
//! https://news.google.com/rss/headlines/section/geo/TW?hl=en&gl=US&ceid=US%3Aen
//! ```
//!
//! Parsing is delegated to `feed-rs`; this module maps its entries onto
//! [`FeedEntry`] and keeps them in document order.

use crate::config::QueryConfig;
use crate::constants::{GOOGLE_NEWS_URL, Topic};
use crate::error::{NewsError, ValidationError};
use crate::http::Transport;
use crate::models::FeedEntry;
use feed_rs::model::Entry;
use feed_rs::parser;
use itertools::Itertools;
use tracing::{debug, info, instrument};
use url::Url;

/// Which headline listing to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedQuery {
    Top,
    Topic(String),
    Location(String),
    Search(String),
}

impl FeedQuery {
    /// Validate the mode-specific input and produce `(path, search term)`.
    ///
    /// Runs before any request so bad input never reaches the network.
    pub fn to_path(&self) -> Result<(String, Option<String>), ValidationError> {
        match self {
            FeedQuery::Top => Ok(("rss".to_string(), None)),
            FeedQuery::Topic(topic) => {
                let topic: Topic = topic.parse()?;
                Ok((format!("rss/headlines/section/topic/{}", topic.name()), None))
            }
            FeedQuery::Location(location) => {
                let location = location.trim();
                if location.is_empty() {
                    return Err(ValidationError::EmptyLocation);
                }
                Ok((
                    format!("rss/headlines/section/geo/{}", urlencoding::encode(location)),
                    None,
                ))
            }
            FeedQuery::Search(term) => {
                let term = term.trim();
                if term.is_empty() {
                    return Err(ValidationError::EmptyQuery);
                }
                Ok(("rss/search".to_string(), Some(term.to_string())))
            }
        }
    }
}

/// Build the `q` value: the term followed by the time-window clauses.
fn search_term(config: &QueryConfig, term: &str) -> String {
    let mut q = term.to_string();
    if let Some(period) = config.period() {
        q.push_str(&format!(" when:{period}"));
    }
    if let Some(end) = config.end_date() {
        q.push_str(&format!(" before:{}", end.format("%Y-%m-%d")));
    }
    if let Some(start) = config.start_date() {
        q.push_str(&format!(" after:{}", start.format("%Y-%m-%d")));
    }
    q
}

/// Compose the aggregator URL for `path` under `config`.
///
/// Every parameter value is percent-encoded, so spaces become `%20`.
pub fn compose_url(config: &QueryConfig, path: &str, search: Option<&str>) -> Result<Url, NewsError> {
    let language = config.language();
    let location = config.location();
    let mut params = vec![
        ("hl", language.to_string()),
        ("gl", location.to_string()),
        ("ceid", format!("{location}:{language}")),
    ];
    if let Some(term) = search {
        params.push(("q", search_term(config, term)));
    }

    let query = params
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .join("&");
    let raw = format!("{GOOGLE_NEWS_URL}{}?{query}", path.trim_start_matches('/'));
    Url::parse(&raw).map_err(|e| NewsError::RequestBuild(format!("error composing '{raw}': {e}")))
}

/// GET `url` and parse the body into feed entries.
///
/// # Errors
///
/// - [`NewsError::Transport`] on network failure or a non-2xx status
/// - [`NewsError::Parse`] if the body is not a well-formed feed
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_feed<T: Transport>(
    transport: &T,
    url: &Url,
    user_agent: &str,
) -> Result<Vec<FeedEntry>, NewsError> {
    let resp = transport.get(url, user_agent).await?;
    if !resp.is_success() {
        return Err(NewsError::transport(
            url.as_str(),
            format!("unexpected status {}", resp.status),
        ));
    }
    let entries = parse_feed(&resp.body)?;
    info!(count = entries.len(), "Parsed feed entries");
    Ok(entries)
}

/// Parse an RSS 2.0, RSS 1.0 or Atom document.
///
/// Entries come back in document order. Entries without a link are skipped;
/// everything downstream relies on an article having one.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>, NewsError> {
    let feed = parser::parse(xml.as_bytes())
        .map_err(|e| NewsError::Parse(format!("malformed feed: {e}")))?;
    Ok(feed.entries.into_iter().filter_map(feed_entry).collect())
}

fn feed_entry(entry: Entry) -> Option<FeedEntry> {
    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .unwrap_or_default();
    let Some(link) = entry_link(&entry) else {
        debug!(%title, "Skipping feed entry without link");
        return None;
    };
    let description = entry
        .summary
        .as_ref()
        .map(|s| s.content.trim().to_string())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()))
        .unwrap_or_default();
    let image_url = entry_image(&entry);

    Some(FeedEntry {
        title,
        description,
        link,
        published: entry.published,
        updated: entry.updated,
        guid: entry.id,
        categories: entry
            .categories
            .into_iter()
            .map(|c| c.term)
            .filter(|t| !t.is_empty())
            .collect(),
        image_url,
    })
}

/// The alternate link when the entry names one, otherwise its first link.
fn entry_link(entry: &Entry) -> Option<String> {
    entry
        .links
        .iter()
        .find(|l| l.rel.as_deref().is_none_or(|r| r == "alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.trim().to_string())
        .filter(|href| !href.is_empty())
}

/// First image among enclosures and `media:content`, then `media:thumbnail`.
fn entry_image(entry: &Entry) -> Option<String> {
    entry
        .media
        .iter()
        .flat_map(|m| &m.content)
        .filter(|c| {
            c.content_type
                .as_ref()
                .is_none_or(|t| t.essence().to_string().starts_with("image/"))
        })
        .find_map(|c| c.url.as_ref().map(|u| u.to_string()))
        .or_else(|| {
            entry
                .media
                .iter()
                .flat_map(|m| &m.thumbnails)
                .map(|t| t.image.uri.clone())
                .next()
        })
}
