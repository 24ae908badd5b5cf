//! Per-request query configuration.
//!
//! A [`QueryConfig`] is built once through [`QueryConfigBuilder`] and never
//! mutated afterwards. Each [`crate::Aggregator`] owns its own copy, so there is
//! no process-wide default that one caller could change under another.

use crate::constants::{MAX_RESULTS, language_code, location_code};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const SECS_PER_HOUR: u64 = 60 * 60;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_LOCATION: &str = "US";
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONCURRENCY: usize = 12;

/// Relative search window rendered as the `when:` clause (`12h`, `7d`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period(Duration);

impl Period {
    /// Saturates instead of overflowing.
    pub fn hours(n: u64) -> Self {
        Period(Duration::from_secs(n.saturating_mul(SECS_PER_HOUR)))
    }

    /// Saturates instead of overflowing.
    pub fn days(n: u64) -> Self {
        Period(Duration::from_secs(n.saturating_mul(SECS_PER_DAY)))
    }
}

impl From<Duration> for Period {
    fn from(d: Duration) -> Self {
        Period(d)
    }
}

impl fmt::Display for Period {
    /// Whole days render as `Nd`; everything else rounds up to whole hours.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        if secs >= SECS_PER_DAY && secs % SECS_PER_DAY == 0 {
            write!(f, "{}d", secs / SECS_PER_DAY)
        } else {
            write!(f, "{}h", secs.div_ceil(SECS_PER_HOUR).max(1))
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((idx, _)) = s.char_indices().last() else {
            return Err("empty period".to_string());
        };
        let (num, unit) = s.split_at(idx);
        let n: u64 = num
            .parse()
            .map_err(|_| format!("invalid period '{s}', expected e.g. 12h or 7d"))?;
        let unit_secs = match unit {
            "h" => SECS_PER_HOUR,
            "d" => SECS_PER_DAY,
            "w" => 7 * SECS_PER_DAY,
            "y" => 365 * SECS_PER_DAY,
            _ => return Err(format!("invalid period unit in '{s}', expected h, d, w or y")),
        };
        n.checked_mul(unit_secs)
            .map(|secs| Period(Duration::from_secs(secs)))
            .ok_or_else(|| format!("period too large: '{s}'"))
    }
}

/// What happens to an article whose aggregator link could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedPolicy {
    /// Keep it with its aggregator link; exclusion rules are not applied to it.
    #[default]
    Keep,
    /// Drop it from the result set.
    Drop,
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub(crate) language: String,
    pub(crate) location: String,
    pub(crate) limit: Option<usize>,
    pub(crate) period: Option<Period>,
    pub(crate) start_date: Option<NaiveDate>,
    pub(crate) end_date: Option<NaiveDate>,
    pub(crate) exclude_hosts: Vec<String>,
    pub(crate) proxy: Option<String>,
    pub(crate) user_agent: Option<String>,
    pub(crate) resolve_timeout: Duration,
    pub(crate) concurrency: usize,
    pub(crate) unresolved: UnresolvedPolicy,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfigBuilder::default().build()
    }
}

impl QueryConfig {
    pub fn builder() -> QueryConfigBuilder {
        QueryConfigBuilder::default()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// `None` means no cap; `Some(0)` means return nothing.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn period(&self) -> Option<Period> {
        self.period
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn exclude_hosts(&self) -> &[String] {
        &self.exclude_hosts
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn resolve_timeout(&self) -> Duration {
        self.resolve_timeout
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn unresolved_policy(&self) -> UnresolvedPolicy {
        self.unresolved
    }
}

#[derive(Debug, Clone)]
pub struct QueryConfigBuilder {
    language: String,
    location: String,
    limit: Option<usize>,
    period: Option<Period>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    exclude_hosts: Vec<String>,
    proxy: Option<String>,
    user_agent: Option<String>,
    resolve_timeout: Duration,
    concurrency: usize,
    unresolved: UnresolvedPolicy,
}

impl Default for QueryConfigBuilder {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            limit: Some(MAX_RESULTS),
            period: None,
            start_date: None,
            end_date: None,
            exclude_hosts: Vec::new(),
            proxy: None,
            user_agent: None,
            resolve_timeout: DEFAULT_RESOLVE_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            unresolved: UnresolvedPolicy::Keep,
        }
    }
}

impl QueryConfigBuilder {
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Cap the result count. Values above [`MAX_RESULTS`] are clamped.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit.min(MAX_RESULTS));
        self
    }

    /// Return every surviving article.
    pub fn unlimited(mut self) -> Self {
        self.limit = None;
        self
    }

    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Clears period and both dates.
    pub fn without_time_window(mut self) -> Self {
        self.period = None;
        self.start_date = None;
        self.end_date = None;
        self
    }

    pub fn exclude_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    /// Width of the per-article fan-out; zero is treated as one.
    pub fn concurrency(mut self, width: usize) -> Self {
        self.concurrency = width.max(1);
        self
    }

    pub fn unresolved(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    /// Finish the config. Known language and location names become their
    /// codes; anything else passes through as given.
    pub fn build(self) -> QueryConfig {
        let language = language_code(&self.language)
            .map_or_else(|| self.language.trim().to_string(), str::to_string);
        let location = location_code(&self.location)
            .map_or_else(|| self.location.trim().to_string(), str::to_string);
        QueryConfig {
            language,
            location,
            limit: self.limit,
            period: self.period,
            start_date: self.start_date,
            end_date: self.end_date,
            exclude_hosts: self.exclude_hosts,
            proxy: self.proxy,
            user_agent: self.user_agent,
            resolve_timeout: self.resolve_timeout,
            concurrency: self.concurrency,
            unresolved: self.unresolved,
        }
    }
}
