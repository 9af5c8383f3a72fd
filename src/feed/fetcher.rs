use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};

use super::decoder::parse_records;

/// Where a feed body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    File(PathBuf),
    Url(Url),
}

impl FromStr for FeedSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        if s.starts_with("http://") || s.starts_with("https://") {
            let url = Url::parse(s)
                .map_err(|e| AppError::Config(format!("invalid feed URL {s:?}: {e}")))?;
            Ok(FeedSource::Url(url))
        } else if s.trim().is_empty() {
            Err(AppError::Config("empty feed source".to_string()))
        } else {
            Ok(FeedSource::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::File(path) => write!(f, "{}", path.display()),
            FeedSource::Url(url) => write!(f, "{url}"),
        }
    }
}

pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("feed-grid/0.1")
            .build()?;

        Ok(Self { client })
    }

    /// Load the raw records of one source, without decoding them.
    pub async fn fetch_records(&self, source: &FeedSource) -> Result<Vec<Value>> {
        let body = match source {
            FeedSource::File(path) => tokio::fs::read_to_string(path).await?,
            FeedSource::Url(url) => {
                let response = self.client.get(url.clone()).send().await?;

                if !response.status().is_success() {
                    return Err(
                        anyhow::anyhow!("Failed to fetch feed: HTTP {}", response.status()).into(),
                    );
                }

                response.text().await?
            }
        };

        parse_records(&body)
    }

    /// Fetch every source concurrently and concatenate their records in
    /// source order. Sources that fail are logged and left out.
    pub async fn fetch_all(&self, sources: &[FeedSource]) -> Vec<Value> {
        let batches: Vec<_> = stream::iter(sources.to_vec())
            .map(|source| async move {
                match self.fetch_records(&source).await {
                    Ok(records) => {
                        tracing::debug!("Fetched {} records from {}", records.len(), source);
                        records
                    }
                    Err(e) => {
                        tracing::warn!("Failed to fetch {}: {}", source, e);
                        Vec::new()
                    }
                }
            })
            .buffered(4) // Max 4 concurrent fetches
            .collect()
            .await;

        batches.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn feed_file(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_sources() {
        assert_eq!(
            "feed.json".parse::<FeedSource>().unwrap(),
            FeedSource::File(PathBuf::from("feed.json"))
        );
        assert!(matches!(
            "https://example.com/feed.json".parse::<FeedSource>().unwrap(),
            FeedSource::Url(_)
        ));
        assert!("https://".parse::<FeedSource>().is_err());
        assert!("  ".parse::<FeedSource>().is_err());
    }

    #[tokio::test]
    async fn fetches_records_from_file() {
        let file = feed_file(r#"[{"type":"BANNER","image":"b.png"},{"type":"COUPON"}]"#);
        let fetcher = FeedFetcher::new().unwrap();

        let records = fetcher
            .fetch_records(&FeedSource::File(file.path().to_path_buf()))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn fetch_all_keeps_source_order_and_skips_failures() {
        let first = feed_file(r#"[{"type":"BANNER","image":"first.png"}]"#);
        let second = feed_file(r#"[{"type":"BANNER","image":"second.png"}]"#);
        let fetcher = FeedFetcher::new().unwrap();

        let sources = vec![
            FeedSource::File(first.path().to_path_buf()),
            FeedSource::File(PathBuf::from("/nonexistent/feed-grid/feed.json")),
            FeedSource::File(second.path().to_path_buf()),
        ];
        let records = fetcher.fetch_all(&sources).await;

        let images: Vec<_> = records.iter().map(|r| r["image"].as_str().unwrap()).collect();
        assert_eq!(images, vec!["first.png", "second.png"]);
    }

    #[tokio::test]
    async fn fetch_all_runs_on_a_spawned_task() {
        let file = feed_file(r#"[{"type":"BANNER","image":"spawned.png"}]"#);
        let fetcher = std::sync::Arc::new(FeedFetcher::new().unwrap());
        let sources = vec![FeedSource::File(file.path().to_path_buf())];

        let task_fetcher = std::sync::Arc::clone(&fetcher);
        let records = tokio::spawn(async move { task_fetcher.fetch_all(&sources).await })
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["image"], "spawned.png");
    }

    #[test]
    fn missing_file_is_io_error() {
        let fetcher = FeedFetcher::new().unwrap();
        let source = FeedSource::File(PathBuf::from("/nonexistent/feed-grid/feed.json"));

        let result = tokio_test::block_on(fetcher.fetch_records(&source));

        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
