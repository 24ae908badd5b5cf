//! Publisher page content extraction.
//!
//! The body is read from the paragraphs inside the container named by the
//! publisher's [`crate::selectors`] rule, after every `<script>` subtree has
//! been removed. Open-graph metadata is read independently of the body, so a
//! page whose body selector matches nothing can still yield a title and image.

use crate::error::NewsError;
use crate::http::{Transport, random_user_agent};
use crate::models::{Article, SourceMetadata};
use crate::resolver::is_aggregator_link;
use crate::selectors;
use crate::utils::{clean_html, truncate_for_log};
use futures::stream::{self, StreamExt};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// What a publisher page yielded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    pub metadata: SourceMetadata,
    /// Cleaned body text; empty when the selector matched nothing.
    pub body: String,
}

/// Outcome counts for a batch extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub succeeded: usize,
    /// Page fetched, metadata stored, but no body text found.
    pub empty: usize,
    pub failed: usize,
    /// Not finished when the batch was cancelled.
    pub cancelled: usize,
}

impl ExtractionReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.empty + self.failed + self.cancelled
    }
}

fn selector(css: &str) -> Result<Selector, NewsError> {
    Selector::parse(css).map_err(|e| NewsError::Parse(format!("invalid selector '{css}': {e}")))
}

fn meta_content(document: &Html, property: &str) -> Option<String> {
    let sel = Selector::parse(&format!(
        r#"meta[property="{property}"], meta[name="{property}"]"#
    ))
    .ok()?;
    document
        .select(&sel)
        .find_map(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn read_metadata(document: &Html) -> SourceMetadata {
    let dimension = |property| meta_content(document, property).and_then(|v| v.parse::<u32>().ok());
    SourceMetadata {
        title: meta_content(document, "og:title"),
        image_url: meta_content(document, "og:image"),
        image_width: dimension("og:image:width"),
        image_height: dimension("og:image:height"),
        description: meta_content(document, "og:description"),
        site_name: meta_content(document, "og:site_name"),
        keywords: meta_content(document, "og:keywords")
            .map(|k| {
                k.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// Extract metadata and body text from `html` using the `container` selector.
///
/// Each paragraph is taken once even when containers nest; a container that is
/// itself a `<p>` contributes its own text.
pub fn parse_page(html: &str, container: &str) -> Result<PageContent, NewsError> {
    let container_sel = selector(container)?;
    let script_sel = selector("script")?;
    let paragraph_sel = selector("p")?;

    let mut document = Html::parse_document(html);
    let scripts: Vec<_> = document.select(&script_sel).map(|el| el.id()).collect();
    for id in scripts {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    let metadata = read_metadata(&document);

    let mut seen = HashSet::new();
    let mut paragraphs = Vec::new();
    for el in document.select(&container_sel) {
        if el.value().name() == "p" {
            if seen.insert(el.id()) {
                paragraphs.push(element_text(el));
            }
            continue;
        }
        for para in el.select(&paragraph_sel) {
            if seen.insert(para.id()) {
                paragraphs.push(element_text(para));
            }
        }
    }

    Ok(PageContent {
        metadata,
        body: clean_html(&paragraphs.join("\n")),
    })
}

/// Fetches publisher pages through a shared [`Transport`].
#[derive(Debug)]
pub struct Extractor<'a, T> {
    transport: &'a T,
    user_agent: Option<&'a str>,
}

impl<'a, T: Transport> Extractor<'a, T> {
    pub fn new(transport: &'a T, user_agent: Option<&'a str>) -> Self {
        Self {
            transport,
            user_agent,
        }
    }

    /// Fetch `url` and extract with the rule for its host.
    ///
    /// An empty body is not an error at this level.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch_page(&self, url: &str) -> Result<PageContent, NewsError> {
        let parsed = Url::parse(url)
            .map_err(|e| NewsError::Parse(format!("invalid article url '{url}': {e}")))?;
        let host = parsed.host_str().unwrap_or_default();
        let container = selectors::selector_for(host);
        if container == selectors::DEFAULT_SELECTOR {
            debug!(host, container, "No selector rule for host; using default");
        }

        let user_agent = self.user_agent.unwrap_or_else(|| random_user_agent());
        let resp = self.transport.get(&parsed, user_agent).await?;
        if !resp.is_success() {
            return Err(NewsError::transport(
                url,
                format!("unexpected status {}", resp.status),
            ));
        }

        let page = parse_page(&resp.body, container)?;
        info!(
            host,
            container,
            bytes = page.body.len(),
            preview = %truncate_for_log(&page.body, 80),
            "Parsed article page"
        );
        Ok(page)
    }

    /// Fetch `url` and return its body text.
    ///
    /// # Errors
    ///
    /// [`NewsError::EmptyContent`] when nothing was extracted, otherwise the
    /// transport or parse error.
    pub async fn extract_content(&self, url: &str) -> Result<String, NewsError> {
        let page = self.fetch_page(url).await?;
        if page.body.is_empty() {
            return Err(NewsError::EmptyContent {
                url: url.to_string(),
            });
        }
        Ok(page.body)
    }

    /// Populate the article's `source_*` fields from its resolved link.
    ///
    /// Metadata is stored even when the body turns out empty, in which case
    /// [`NewsError::EmptyContent`] is returned.
    ///
    /// # Errors
    ///
    /// [`NewsError::NoSourceLink`] if the link is still an aggregator link.
    pub async fn extract_article(&self, article: &mut Article) -> Result<(), NewsError> {
        if is_aggregator_link(&article.link) {
            return Err(NewsError::NoSourceLink {
                link: article.link.clone(),
            });
        }
        let page = self.fetch_page(&article.link).await?;
        article.apply_metadata(page.metadata);
        if page.body.is_empty() {
            return Err(NewsError::EmptyContent {
                url: article.link.clone(),
            });
        }
        article.source_content = Some(page.body);
        Ok(())
    }

    /// Extract every article, at most `width` at a time.
    ///
    /// Failures are logged and counted; they never abort the batch.
    pub async fn extract_all(&self, articles: &mut [Article], width: usize) -> ExtractionReport {
        self.extract_all_with_cancel(articles, width, &CancellationToken::new())
            .await
    }

    /// Like [`Extractor::extract_all`], but stops when `cancel` fires.
    ///
    /// In-flight fetches are dropped; articles they belonged to keep whatever
    /// they had and are counted as `cancelled`.
    #[instrument(level = "info", skip_all, fields(count = articles.len(), width = width))]
    pub async fn extract_all_with_cancel(
        &self,
        articles: &mut [Article],
        width: usize,
        cancel: &CancellationToken,
    ) -> ExtractionReport {
        let total = articles.len();
        let results: Vec<Result<(), NewsError>> = stream::iter(articles.iter_mut())
            .map(|article| async move {
                let result = self.extract_article(article).await;
                match &result {
                    Ok(()) => debug!(link = %article.link, "Extracted article"),
                    Err(NewsError::EmptyContent { .. }) => {
                        warn!(link = %article.link, "Extraction produced no content")
                    }
                    Err(e) => warn!(link = %article.link, error = %e, "Extraction failed"),
                }
                result
            })
            .buffer_unordered(width.max(1))
            .take_until(cancel.cancelled())
            .collect()
            .await;

        let unfinished = ExtractionReport {
            cancelled: total - results.len(),
            ..ExtractionReport::default()
        };
        let report = results
            .iter()
            .fold(unfinished, |mut report, r| {
                match r {
                    Ok(()) => report.succeeded += 1,
                    Err(NewsError::EmptyContent { .. }) => report.empty += 1,
                    Err(_) => report.failed += 1,
                }
                report
            });
        info!(
            succeeded = report.succeeded,
            empty = report.empty,
            failed = report.failed,
            cancelled = report.cancelled,
            "Finished content extraction"
        );
        report
    }
}
