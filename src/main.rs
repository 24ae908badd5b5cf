//! # awful_gnews
//!
//! Command-line front end: run one Google News query, optionally extract
//! article content, and print the articles as JSON.
//!
//! ```sh
//! awful_gnews --location TW --language zh-Hant topic business
//! awful_gnews --period 7d --extract -j ./out/rust.json search "rust language"
//! ```
//!
//! Logs go to stderr (`RUST_LOG` controls the filter) so stdout stays clean
//! JSON. Ctrl-C stops link resolution or extraction and prints what was
//! finished so far.

use awful_gnews::{Aggregator, FeedQuery, NewsError};
use clap::Parser;
use std::error::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod outputs;

use cli::{Cli, Command};
use outputs::json;

fn feed_query(command: &Command) -> FeedQuery {
    match command {
        Command::Top => FeedQuery::Top,
        Command::Topic { name } => FeedQuery::Topic(name.clone()),
        Command::Location { name } => FeedQuery::Location(name.clone()),
        Command::Search { query } => FeedQuery::Search(query.clone()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(command = ?args.command, extract = args.extract, "Parsed CLI arguments");

    let config = args.options.to_config();
    let news = Aggregator::new(config)?;
    let query = feed_query(&args.command);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; finishing with partial results");
                cancel.cancel();
            }
        });
    }

    let mut articles = match news.get_news_with_cancel(&query, &cancel).await {
        Ok(articles) => articles,
        Err(NewsError::Cancelled { partial }) => partial,
        Err(e) => {
            error!(error = %e, "Query failed");
            return Err(e.into());
        }
    };

    if args.extract {
        let report = news.extract_all_with_cancel(&mut articles, &cancel).await;
        info!(
            succeeded = report.succeeded,
            empty = report.empty,
            failed = report.failed,
            cancelled = report.cancelled,
            "Content extraction finished"
        );
    }

    json::write_articles(&articles, args.json_output.as_deref()).await?;

    info!(
        articles = articles.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Done"
    );
    Ok(())
}
