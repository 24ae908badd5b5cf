//! Publisher host → article-body selector table.
//!
//! Adding a publisher means adding one [`SelectorRule`] to [`RULES`]. Hosts are
//! compared after [`normalize_host`], exact rules win over suffix rules, and
//! unknown hosts fall back to [`DEFAULT_SELECTOR`].

use crate::utils::{host_matches, normalize_host};

/// Container guessed for publishers without a rule.
pub const DEFAULT_SELECTOR: &str = ".article-body";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPattern {
    /// Matches this host only.
    Exact(&'static str),
    /// Matches this domain and any subdomain of it.
    Suffix(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorRule {
    pub host: HostPattern,
    /// CSS selector for the element(s) holding the article paragraphs.
    pub selector: &'static str,
}

const fn exact(host: &'static str, selector: &'static str) -> SelectorRule {
    SelectorRule {
        host: HostPattern::Exact(host),
        selector,
    }
}

const fn suffix(host: &'static str, selector: &'static str) -> SelectorRule {
    SelectorRule {
        host: HostPattern::Suffix(host),
        selector,
    }
}

pub const RULES: &[SelectorRule] = &[
    suffix("yahoo.com", ".caas-body"),
    suffix("chinatimes.com", ".article-body"),
    suffix("tvbs.com.tw", ".article_content"),
    suffix("udn.com", ".article-content__editor"),
    suffix("appledaily.com", ".ndArticle_margin"),
    suffix("ettoday.net", ".story"),
    exact("news.ltn.com.tw", ".text"),
    suffix("cnn.com", ".article__content"),
    suffix("reuters.com", "[data-testid=\"ArticleBody\"]"),
    suffix("cnbc.com", ".ArticleBody-articleBody"),
    suffix("marketwatch.com", ".article__body"),
    exact("cna.com.tw", ".paragraph"),
    exact("setn.com", ".article-content"),
    suffix("apnews.com", ".RichTextStoryBody"),
    suffix("npr.org", "#storytext"),
    suffix("aljazeera.com", ".wysiwyg"),
    suffix("bbc.com", "article"),
    suffix("bbc.co.uk", "article"),
    suffix("theguardian.com", "#maincontent"),
];

impl SelectorRule {
    fn matches(&self, host: &str) -> bool {
        match self.host {
            HostPattern::Exact(h) => host == h,
            HostPattern::Suffix(h) => host_matches(host, h),
        }
    }
}

/// Find the rule for `host`, or `None` for publishers we know nothing about.
pub fn lookup(host: &str) -> Option<&'static SelectorRule> {
    let host = normalize_host(host);
    RULES
        .iter()
        .find(|r| matches!(r.host, HostPattern::Exact(_)) && r.matches(&host))
        .or_else(|| {
            RULES
                .iter()
                .find(|r| matches!(r.host, HostPattern::Suffix(_)) && r.matches(&host))
        })
}

/// Selector to use for `host`, falling back to [`DEFAULT_SELECTOR`].
pub fn selector_for(host: &str) -> &'static str {
    lookup(host).map_or(DEFAULT_SELECTOR, |r| r.selector)
}
