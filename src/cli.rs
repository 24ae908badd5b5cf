//! Command-line interface definitions.
//!
//! Every global option can also come from the environment where an `env`
//! name is given.

use awful_gnews::config::{Period, QueryConfig, UnresolvedPolicy};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

/// Fetch Google News feeds, resolve publisher links, and print articles as JSON.
///
/// # Examples
///
/// ```sh
/// # Top stories for Taiwan in Traditional Chinese
/// awful_gnews --language zh-Hant --location TW top
///
/// # Last three days of search results, without CNN, with article bodies
/// awful_gnews --period 3d --exclude cnn.com --extract search "rust language"
///
/// # Through a proxy, written to a file
/// GNEWS_PROXY=http://127.0.0.1:8080 awful_gnews --json-output out.json topic technology
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub options: QueryOptions,

    /// Fetch each article page and fill in body text and metadata
    #[arg(long, global = true)]
    pub extract: bool,

    /// Write JSON to this file instead of stdout
    #[arg(short, long, global = true)]
    pub json_output: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Top stories
    Top,
    /// Stories for one topic (WORLD, NATION, BUSINESS, TECHNOLOGY, ...)
    Topic { name: String },
    /// Stories about a place
    Location { name: String },
    /// Full-text search
    Search { query: String },
}

#[derive(Args, Debug)]
pub struct QueryOptions {
    /// Feed language, by code or name
    #[arg(long, global = true, env = "GNEWS_LANGUAGE", default_value = "en")]
    pub language: String,

    /// Feed country, by code or name
    #[arg(long, global = true, env = "GNEWS_LOCATION", default_value = "US")]
    pub location: String,

    /// Maximum number of articles (capped at 100)
    #[arg(long, global = true, conflicts_with = "unlimited")]
    pub limit: Option<usize>,

    /// Return every article the feed holds
    #[arg(long, global = true)]
    pub unlimited: bool,

    /// Search window such as 12h, 7d, 2w or 1y
    #[arg(long, global = true)]
    pub period: Option<Period>,

    /// Only articles published after this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub after: Option<NaiveDate>,

    /// Only articles published before this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub before: Option<NaiveDate>,

    /// Drop articles from this host and its subdomains (repeatable)
    #[arg(long = "exclude", global = true)]
    pub exclude: Vec<String>,

    /// Proxy URL for every request
    #[arg(long, global = true, env = "GNEWS_PROXY")]
    pub proxy: Option<String>,

    /// Fixed User-Agent instead of a random browser one
    #[arg(long, global = true, env = "GNEWS_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Seconds allowed to resolve one link
    #[arg(long, global = true, default_value_t = 10)]
    pub resolve_timeout: u64,

    /// Requests in flight at once
    #[arg(long, global = true, default_value_t = 12)]
    pub concurrency: usize,

    /// Drop articles whose link cannot be resolved instead of keeping them
    #[arg(long, global = true)]
    pub drop_unresolved: bool,
}

impl QueryOptions {
    pub fn to_config(&self) -> QueryConfig {
        let mut builder = QueryConfig::builder()
            .language(&self.language)
            .location(&self.location)
            .exclude_hosts(&self.exclude)
            .resolve_timeout(Duration::from_secs(self.resolve_timeout))
            .concurrency(self.concurrency);

        if self.unlimited {
            builder = builder.unlimited();
        } else if let Some(limit) = self.limit {
            builder = builder.limit(limit);
        }
        if let Some(period) = self.period {
            builder = builder.period(period);
        }
        if let Some(after) = self.after {
            builder = builder.start_date(after);
        }
        if let Some(before) = self.before {
            builder = builder.end_date(before);
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if self.drop_unresolved {
            builder = builder.unresolved(UnresolvedPolicy::Drop);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(&["awful_gnews", "top"]);
        assert_eq!(cli.command, Command::Top);
        assert!(!cli.extract);
        assert!(cli.json_output.is_none());

        let config = cli.options.to_config();
        assert_eq!(config.language(), "en");
        assert_eq!(config.location(), "US");
        assert_eq!(config.limit(), Some(100));
    }

    #[test]
    fn test_cli_subcommand_with_options() {
        let cli = Cli::parse_from(&[
            "awful_gnews",
            "search",
            "rust language",
            "--period",
            "3d",
            "--exclude",
            "cnn.com",
            "--exclude",
            "bbc.com",
            "--limit",
            "5",
            "--extract",
            "-j",
            "/tmp/out.json",
        ]);

        assert_eq!(
            cli.command,
            Command::Search {
                query: "rust language".to_string()
            }
        );
        assert!(cli.extract);
        assert_eq!(cli.json_output.as_deref(), Some("/tmp/out.json"));

        let config = cli.options.to_config();
        assert_eq!(config.limit(), Some(5));
        assert_eq!(config.period(), Some(Period::days(3)));
        assert_eq!(config.exclude_hosts(), ["cnn.com", "bbc.com"]);
    }

    #[test]
    fn test_cli_dates_and_policies() {
        let cli = Cli::parse_from(&[
            "awful_gnews",
            "--after",
            "2025-05-01",
            "--before",
            "2025-05-06",
            "--unlimited",
            "--drop-unresolved",
            "--resolve-timeout",
            "3",
            "topic",
            "business",
        ]);

        let config = cli.options.to_config();
        assert_eq!(config.limit(), None);
        assert_eq!(config.start_date(), NaiveDate::from_ymd_opt(2025, 5, 1));
        assert_eq!(config.end_date(), NaiveDate::from_ymd_opt(2025, 5, 6));
        assert_eq!(config.unresolved_policy(), UnresolvedPolicy::Drop);
        assert_eq!(config.resolve_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_cli_rejects_limit_with_unlimited() {
        let res = Cli::try_parse_from(&["awful_gnews", "--limit", "3", "--unlimited", "top"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_cli_rejects_bad_period() {
        let res = Cli::try_parse_from(&["awful_gnews", "--period", "3x", "top"]);
        assert!(res.is_err());
    }
}
