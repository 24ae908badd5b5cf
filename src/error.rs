//! Error taxonomy for the aggregation pipeline.
//!
//! Batch operations never fail because a single article could not be resolved
//! or extracted; those failures are logged and counted. The variants here are
//! what a single call hands back to its caller.

use crate::models::Article;
use std::time::Duration;
use thiserror::Error;

/// Input problems caught before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("query cannot be empty")]
    EmptyQuery,
    #[error("topic cannot be empty")]
    EmptyTopic,
    #[error("location cannot be empty")]
    EmptyLocation,
    #[error("invalid topic: {0}")]
    InvalidTopic(String),
}

#[derive(Debug, Error)]
pub enum NewsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("error building request: {0}")]
    RequestBuild(String),

    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    /// The page was fetched but no body text survived extraction.
    #[error("failed to get news content from {url}")]
    EmptyContent { url: String },

    /// Extraction was attempted on an article whose link was never resolved.
    #[error("no source link for {link}")]
    NoSourceLink { link: String },

    #[error("aggregator link did not redirect: {link}")]
    NoRedirect { link: String },

    #[error("resolving {link} timed out after {after:?}")]
    Timeout { link: String, after: Duration },

    /// The batch was cancelled; `partial` holds the articles finalised so far.
    #[error("operation cancelled with {} partial results", partial.len())]
    Cancelled { partial: Vec<Article> },
}

impl NewsError {
    pub fn is_validation(&self) -> bool {
        matches!(self, NewsError::Validation(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, NewsError::Transport { .. })
    }

    pub(crate) fn transport(url: impl Into<String>, message: impl ToString) -> Self {
        NewsError::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

impl From<url::ParseError> for NewsError {
    fn from(e: url::ParseError) -> Self {
        NewsError::RequestBuild(e.to_string())
    }
}
