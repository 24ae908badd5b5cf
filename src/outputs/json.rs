//! JSON output of the article list.
//!
//! With no path the JSON goes to stdout so the binary composes with `jq` and
//! friends; with a path, parent directories are created first.

use awful_gnews::Article;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, instrument};

/// Serialize `articles` as pretty JSON and write them to `path`, or stdout.
#[instrument(level = "info", skip_all, fields(count = articles.len(), path = ?path))]
pub async fn write_articles(articles: &[Article], path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(articles)?;

    let Some(path) = path else {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        return Ok(());
    };

    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!(%path, "Wrote JSON");
    Ok(())
}
