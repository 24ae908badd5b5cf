//! Data models for feed entries and the articles built from them.
//!
//! - [`FeedEntry`]: one raw `<item>`/`<entry>` as the feed parser saw it
//! - [`Article`]: the unit that flows through resolution and extraction
//! - [`SourceMetadata`]: open-graph fields read from the publisher page
//!
//! Articles serialize with camelCase field names so the JSON output reads the
//! same way the aggregator's own feeds are usually consumed.

use crate::utils::{clean_description, normalize_host};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single feed entry prior to conversion into an [`Article`].
///
/// Text is what the feed carried, entities decoded; descriptions still
/// contain HTML. Timestamps the feed parser could not read are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub description: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub guid: String,
    pub categories: Vec<String>,
    pub image_url: Option<String>,
}

/// Open-graph metadata scraped from a publisher page.
///
/// Every field is optional; pages routinely omit most of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMetadata {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub description: Option<String>,
    pub site_name: Option<String>,
    pub keywords: Vec<String>,
}

/// A news article.
///
/// `link` starts as the aggregator link and is replaced by the publisher URL
/// once resolved. The `source_*` fields stay empty until content extraction
/// runs against the resolved link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: String,
    pub link: String,
    pub published: String,
    pub published_at: Option<DateTime<Utc>>,
    pub updated: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub guid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_image_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_image_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_content: Option<String>,
}

impl From<FeedEntry> for Article {
    fn from(entry: FeedEntry) -> Self {
        Article {
            published: entry.published.map(|d| d.to_rfc3339()).unwrap_or_default(),
            published_at: entry.published,
            updated: entry.updated.map(|d| d.to_rfc3339()).unwrap_or_default(),
            updated_at: entry.updated,
            description: clean_description(&entry.description),
            title: entry.title,
            link: entry.link,
            image_url: entry.image_url,
            categories: entry.categories,
            guid: entry.guid,
            ..Article::default()
        }
    }
}

impl Article {
    /// Normalized host of the current link (`www.` stripped, lower-case).
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.link)
            .ok()
            .and_then(|u| u.host_str().map(normalize_host))
    }

    /// Copy open-graph fields onto the article.
    pub fn apply_metadata(&mut self, meta: SourceMetadata) {
        self.source_title = meta.title;
        self.source_image_url = meta.image_url;
        self.source_image_width = meta.image_width;
        self.source_image_height = meta.image_height;
        self.source_description = meta.description;
        self.source_site_name = meta.site_name;
        self.source_keywords = meta.keywords;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry() -> FeedEntry {
        FeedEntry {
            title: "Markets rally - Reuters".to_string(),
            description: r##"<a href="https://news.google.com/x">Markets rally</a>&nbsp;&nbsp;<font color="#6f6f6f">Reuters</font>"##.to_string(),
            link: "https://news.google.com/rss/articles/CBMiabc?oc=5".to_string(),
            published: Some(Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap()),
            updated: None,
            guid: "CBMiabc".to_string(),
            categories: vec!["Business".to_string()],
            image_url: None,
        }
    }

    #[test]
    fn test_article_from_entry() {
        let article = Article::from(entry());
        assert_eq!(article.title, "Markets rally - Reuters");
        assert_eq!(article.description, "Markets rally Reuters");
        assert_eq!(
            article.published_at,
            Some(Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap())
        );
        assert_eq!(article.published, "2025-05-06T14:30:00+00:00");
        assert_eq!(article.updated_at, None);
        assert!(article.updated.is_empty());
        assert_eq!(article.categories, vec!["Business".to_string()]);
        assert!(article.source_content.is_none());
        assert!(article.source_keywords.is_empty());
    }

    #[test]
    fn test_article_host() {
        let mut article = Article::from(entry());
        assert_eq!(article.host(), Some("news.google.com".to_string()));
        article.link = "https://WWW.Reuters.com/markets/".to_string();
        assert_eq!(article.host(), Some("reuters.com".to_string()));
        article.link = "not a url".to_string();
        assert_eq!(article.host(), None);
    }

    #[test]
    fn test_apply_metadata() {
        let mut article = Article::from(entry());
        article.apply_metadata(SourceMetadata {
            title: Some("Markets rally".to_string()),
            image_width: Some(1200),
            keywords: vec!["stocks".to_string(), "bonds".to_string()],
            ..SourceMetadata::default()
        });
        assert_eq!(article.source_title.as_deref(), Some("Markets rally"));
        assert_eq!(article.source_image_width, Some(1200));
        assert_eq!(article.source_keywords.len(), 2);
        assert!(article.source_site_name.is_none());
    }

    #[test]
    fn test_article_serialization_skips_unset_source_fields() {
        let article = Article::from(entry());
        let json = serde_json::to_string(&article).unwrap();
        assert!(json.contains("\"publishedAt\""));
        assert!(json.contains("\"imageUrl\":null"));
        assert!(!json.contains("sourceContent"));
        assert!(!json.contains("sourceKeywords"));

        let back: Article = serde_json::from_str(&json).unwrap();
        assert_eq!(back, article);
    }
}
