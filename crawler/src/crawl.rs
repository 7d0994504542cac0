use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use url::Url;

use crate::extract::{extract, PageRecord};
use crate::fetch::Fetcher;
use crate::frontier::Frontier;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub max_pages: usize,
    pub max_depth: u32,
    pub concurrency: usize,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: 200,
            max_depth: 8,
            concurrency: 8,
            timeout: Duration::from_secs(12),
            user_agent: "ferret-crawler/0.1 (+https://example.invalid/bot)".to_string(),
        }
    }
}

/// Breadth-first site crawler: a bounded worker pool drains the Frontier,
/// each success emits one immutable `PageRecord` and feeds outbound links
/// back in at depth+1. The Frontier is the only shared mutable state.
pub struct Crawler {
    fetcher: Arc<Fetcher>,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Result<Self, reqwest::Error> {
        let fetcher = Arc::new(Fetcher::new(&config.user_agent, config.timeout)?);
        Ok(Self { fetcher, config })
    }

    /// Crawl from `seed` until the frontier is exhausted or `max_pages`
    /// records were produced. Per-URL fetch failures are logged and
    /// dropped; hitting the page limit discards the rest of the frontier
    /// and completes the run normally.
    pub async fn run(&self, seed: &Url) -> Vec<PageRecord> {
        let frontier = Arc::new(Frontier::new(seed, self.config.max_depth));
        frontier.enqueue(seed.clone(), 0);

        let mut records: Vec<PageRecord> = Vec::new();
        let mut inflight: JoinSet<(u32, Option<PageRecord>)> = JoinSet::new();

        loop {
            // keep the pool full, but never schedule past the page budget
            while inflight.len() < self.config.concurrency
                && records.len() + inflight.len() < self.config.max_pages
            {
                let Some(entry) = frontier.dequeue() else {
                    break;
                };
                let fetcher = self.fetcher.clone();
                inflight.spawn(async move {
                    match fetcher.fetch(&entry.url).await {
                        Ok(html) => (entry.depth, Some(extract(&html, &entry.url))),
                        Err(err) => {
                            tracing::warn!(url = %entry.url, error = %err, "fetch failed, dropping url");
                            (entry.depth, None)
                        }
                    }
                });
            }

            let Some(joined) = inflight.join_next().await else {
                // frontier drained and every in-flight fetch completed
                break;
            };
            match joined {
                Ok((depth, Some(record))) => {
                    for link in &record.links {
                        frontier.enqueue(link.clone(), depth + 1);
                    }
                    tracing::debug!(url = %record.url, depth, "crawled page");
                    records.push(record);
                    if records.len() >= self.config.max_pages {
                        tracing::info!(
                            discarded = frontier.queued_count(),
                            "page limit reached, discarding remaining frontier"
                        );
                        inflight.abort_all();
                        break;
                    }
                }
                Ok((_, None)) => {}
                Err(err) if err.is_cancelled() => {}
                Err(err) => {
                    tracing::warn!(error = %err, "crawl worker panicked");
                }
            }
        }

        tracing::info!(
            pages = records.len(),
            visited = frontier.seen_count(),
            "crawl complete"
        );
        records
    }
}
