//! Helpers shared across the pipeline.
//!
//! - HTML-to-text cleanup for feed descriptions and extracted bodies
//! - Host normalization and label-boundary host matching
//! - String truncation for logging

use scraper::Html;

/// Turn an HTML snippet into plain text.
///
/// Tags are dropped and entities decoded. Within each line, runs of whitespace
/// collapse to a single space; blank lines are removed.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_html("<b>Hello</b>&nbsp; world\n\n  next "), "Hello world\nnext");
/// ```
pub fn clean_html(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    let text: String = fragment.root_element().text().collect();
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flatten a feed description into a single line of plain text.
pub fn clean_description(input: &str) -> String {
    clean_html(input)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a hostname (or a URL-ish string a user typed) for comparison.
///
/// Lower-cases, strips scheme, path, port and a leading `www.`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_host("https://WWW.CNN.com:443/world"), "cnn.com");
/// ```
pub fn normalize_host(raw: &str) -> String {
    let mut host = raw.trim().to_lowercase();
    if let Some(idx) = host.find("://") {
        host.replace_range(..idx + 3, "");
    }
    if let Some(idx) = host.find(['/', '?', '#']) {
        host.truncate(idx);
    }
    if let Some(idx) = host.rfind(':') {
        if host[idx + 1..].chars().all(|c| c.is_ascii_digit()) {
            host.truncate(idx);
        }
    }
    let host = host.trim_end_matches('.');
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// `true` when `host` is `pattern` or a subdomain of it.
///
/// Matching happens on label boundaries, so `cnn.com` matches `edition.cnn.com`
/// but neither `notcnn.com` nor `cnn.com.evil.tld`.
pub fn host_matches(host: &str, pattern: &str) -> bool {
    let host = normalize_host(host);
    let pattern = normalize_host(pattern);
    if pattern.is_empty() {
        return false;
    }
    host == pattern
        || host
            .strip_suffix(pattern.as_str())
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with
/// `"…(+N bytes)"` appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
