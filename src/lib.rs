//! # Awful GNews
//!
//! Google News feed aggregation: compose a feed URL for top stories, a topic,
//! a location or a search, parse the RSS/Atom response, resolve each
//! aggregator redirect link to the publisher's URL, then filter, dedupe, sort
//! and limit the result. Article body text and open-graph metadata can be
//! extracted afterwards on request.
//!
//! ## Usage
//!
//! ```no_run
//! use awful_gnews::{Aggregator, QueryConfig};
//!
//! # async fn run() -> Result<(), awful_gnews::NewsError> {
//! let config = QueryConfig::builder()
//!     .language("en")
//!     .location("US")
//!     .limit(10)
//!     .exclude_hosts(["cnn.com"])
//!     .build();
//! let news = Aggregator::new(config)?;
//!
//! let mut articles = news.search_news("rust language").await?;
//! let report = news.extract_all(&mut articles).await;
//! println!("{} articles, {} with content", articles.len(), report.succeeded);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`aggregator`]: the pipeline and its entry points
//! - [`feed`]: URL composition and feed parsing
//! - [`resolver`]: aggregator link → publisher link
//! - [`extractor`]: page fetch, body text and metadata
//! - [`selectors`]: per-publisher body selectors
//! - [`http`]: the [`Transport`] seam and its `reqwest` implementation

pub mod aggregator;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod feed;
pub mod http;
pub mod models;
pub mod resolver;
pub mod selectors;
pub mod utils;

#[cfg(test)]
mod testing;

pub use aggregator::Aggregator;
pub use config::{Period, QueryConfig, QueryConfigBuilder, UnresolvedPolicy};
pub use constants::Topic;
pub use error::{NewsError, ValidationError};
pub use extractor::{ExtractionReport, Extractor, PageContent, parse_page};
pub use feed::{FeedQuery, parse_feed};
pub use http::{HttpResponse, ReqwestTransport, Transport};
pub use models::{Article, FeedEntry, SourceMetadata};
pub use resolver::{LinkResolver, is_aggregator_link};
