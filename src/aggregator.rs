//! The aggregation pipeline.
//!
//! ```text
//! validate query ─► compose URL ─► fetch + parse feed
//!     ─► per article, concurrently: resolve link ─► exclusion filter
//!     ─► dedupe ─► sort (newest first) ─► limit
//! ```
//!
//! Content extraction is a separate, opt-in step ([`Aggregator::extract_content`],
//! [`Aggregator::extract_all`]) because it costs one page fetch per article.
//!
//! # Failure policy
//!
//! Only validation, the feed fetch, and cancellation fail a call. A link that
//! cannot be resolved (error or timeout) is handled per
//! [`UnresolvedPolicy`]; either way the rest of the batch proceeds.

use crate::config::{QueryConfig, UnresolvedPolicy};
use crate::error::NewsError;
use crate::extractor::{ExtractionReport, Extractor};
use crate::feed::{FeedQuery, compose_url, fetch_feed};
use crate::http::{ReqwestTransport, Transport, random_user_agent};
use crate::models::Article;
use crate::resolver::LinkResolver;
use crate::utils::host_matches;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::cmp::Reverse;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Entry point for fetching, resolving and extracting news.
///
/// # Examples
///
/// ```ignore
/// let config = QueryConfig::builder().language("en").location("US").limit(5).build();
/// let news = Aggregator::new(config)?;
/// let mut articles = news.topic_news("technology").await?;
/// let report = news.extract_all(&mut articles).await;
/// ```
#[derive(Debug)]
pub struct Aggregator<T = ReqwestTransport> {
    config: QueryConfig,
    transport: T,
}

impl Aggregator<ReqwestTransport> {
    /// Build an aggregator with a `reqwest` transport honouring the config's proxy.
    pub fn new(config: QueryConfig) -> Result<Self, NewsError> {
        let transport = ReqwestTransport::new(config.proxy())?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Aggregator<T> {
    pub fn with_transport(config: QueryConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn resolver(&self) -> LinkResolver<'_, T> {
        LinkResolver::new(&self.transport, self.config.user_agent())
    }

    pub fn extractor(&self) -> Extractor<'_, T> {
        Extractor::new(&self.transport, self.config.user_agent())
    }

    pub async fn top_news(&self) -> Result<Vec<Article>, NewsError> {
        self.get_news(&FeedQuery::Top).await
    }

    pub async fn topic_news(&self, topic: &str) -> Result<Vec<Article>, NewsError> {
        self.get_news(&FeedQuery::Topic(topic.to_string())).await
    }

    pub async fn location_news(&self, location: &str) -> Result<Vec<Article>, NewsError> {
        self.get_news(&FeedQuery::Location(location.to_string())).await
    }

    pub async fn search_news(&self, query: &str) -> Result<Vec<Article>, NewsError> {
        self.get_news(&FeedQuery::Search(query.to_string())).await
    }

    pub async fn get_news(&self, query: &FeedQuery) -> Result<Vec<Article>, NewsError> {
        self.get_news_with_cancel(query, &CancellationToken::new())
            .await
    }

    /// Run the pipeline, aborting in-flight work when `cancel` fires.
    ///
    /// # Errors
    ///
    /// - [`NewsError::Validation`] before any request for bad input
    /// - [`NewsError::RequestBuild`], [`NewsError::Transport`], [`NewsError::Parse`]
    ///   from the feed fetch
    /// - [`NewsError::Cancelled`] carrying the articles finalised so far
    #[instrument(level = "info", skip_all, fields(query = ?query))]
    pub async fn get_news_with_cancel(
        &self,
        query: &FeedQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<Article>, NewsError> {
        let t0 = Instant::now();
        let (path, search) = query.to_path()?;
        let url = compose_url(&self.config, &path, search.as_deref())?;
        let user_agent = self
            .config
            .user_agent()
            .unwrap_or_else(|| random_user_agent());

        let entries = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Cancelled before the feed was fetched");
                return Err(NewsError::Cancelled { partial: Vec::new() });
            }
            entries = fetch_feed(&self.transport, &url, user_agent) => entries?,
        };

        let total = entries.len();
        let resolver = self.resolver();
        let resolver = &resolver;
        let outcomes: Vec<(usize, Option<Article>)> =
            stream::iter(entries.into_iter().map(Article::from).enumerate())
                .map(|(idx, article)| async move {
                    (idx, self.resolve_and_filter(resolver, article).await)
                })
                .buffer_unordered(self.config.concurrency())
                .take_until(cancel.cancelled())
                .collect()
                .await;

        let completed = outcomes.len();
        let survivors: Vec<(usize, Article)> = outcomes
            .into_iter()
            .filter_map(|(idx, article)| article.map(|a| (idx, a)))
            .collect();
        let articles = self.assemble(survivors);

        if completed < total {
            warn!(completed, total, kept = articles.len(), "Cancelled during link resolution");
            return Err(NewsError::Cancelled { partial: articles });
        }

        info!(
            entries = total,
            returned = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Assembled news"
        );
        Ok(articles)
    }

    /// Resolve one article's link and apply the exclusion list.
    ///
    /// `None` means the article leaves the result set.
    async fn resolve_and_filter(
        &self,
        resolver: &LinkResolver<'_, T>,
        mut article: Article,
    ) -> Option<Article> {
        match self.resolve_with_timeout(resolver, &article.link).await {
            Ok(link) => {
                article.link = link;
                if self.is_excluded(&article) {
                    debug!(link = %article.link, "Excluded article");
                    return None;
                }
                Some(article)
            }
            Err(e) => {
                warn!(link = %article.link, error = %e, "Failed to resolve link");
                match self.config.unresolved_policy() {
                    UnresolvedPolicy::Keep => Some(article),
                    UnresolvedPolicy::Drop => None,
                }
            }
        }
    }

    async fn resolve_with_timeout(
        &self,
        resolver: &LinkResolver<'_, T>,
        link: &str,
    ) -> Result<String, NewsError> {
        let after = self.config.resolve_timeout();
        tokio::time::timeout(after, resolver.resolve(link))
            .await
            .unwrap_or_else(|_| {
                Err(NewsError::Timeout {
                    link: link.to_string(),
                    after,
                })
            })
    }

    fn is_excluded(&self, article: &Article) -> bool {
        let excluded = self.config.exclude_hosts();
        if excluded.is_empty() {
            return false;
        }
        article
            .host()
            .is_some_and(|host| excluded.iter().any(|pattern| host_matches(&host, pattern)))
    }

    /// Dedupe by link (first in feed order wins), sort newest first with
    /// undated articles last, then apply the limit.
    fn assemble(&self, mut survivors: Vec<(usize, Article)>) -> Vec<Article> {
        survivors.sort_by_key(|(idx, _)| *idx);
        let mut unique: Vec<(usize, Article)> = survivors
            .into_iter()
            .unique_by(|(_, a)| a.link.clone())
            .collect();
        unique.sort_by_key(|(idx, a)| (Reverse(a.published_at), *idx));

        let mut articles: Vec<Article> = unique.into_iter().map(|(_, a)| a).collect();
        if let Some(limit) = self.config.limit() {
            articles.truncate(limit);
        }
        articles
    }

    /// Resolve a caller-held batch in place, without filtering.
    ///
    /// Returns how many links were resolved; failures keep their original link.
    #[instrument(level = "info", skip_all, fields(count = articles.len()))]
    pub async fn resolve_links(&self, articles: &mut [Article]) -> usize {
        let resolver = self.resolver();
        let resolver = &resolver;
        let resolved: Vec<bool> = stream::iter(articles.iter_mut())
            .map(|article| async move {
                match self.resolve_with_timeout(resolver, &article.link).await {
                    Ok(link) => {
                        article.link = link;
                        true
                    }
                    Err(e) => {
                        warn!(link = %article.link, error = %e, "Failed to resolve link");
                        false
                    }
                }
            })
            .buffer_unordered(self.config.concurrency())
            .collect()
            .await;
        let count = resolved.into_iter().filter(|ok| *ok).count();
        info!(resolved = count, "Resolved links");
        count
    }

    /// Extract one article's body and metadata from its resolved link.
    pub async fn extract_content(&self, article: &mut Article) -> Result<(), NewsError> {
        self.extractor().extract_article(article).await
    }

    /// Extract every article, bounded by the configured fan-out width.
    pub async fn extract_all(&self, articles: &mut [Article]) -> ExtractionReport {
        self.extractor()
            .extract_all(articles, self.config.concurrency())
            .await
    }

    /// Extract every article until `cancel` fires.
    pub async fn extract_all_with_cancel(
        &self,
        articles: &mut [Article],
        cancel: &CancellationToken,
    ) -> ExtractionReport {
        self.extractor()
            .extract_all_with_cancel(articles, self.config.concurrency(), cancel)
            .await
    }
}
