use anyhow::{Context, Result};
use ferret_core::persist::{index_exists, save_index};
use ferret_core::{IndexBuilder, IndexError, SearchIndex};
use std::path::PathBuf;
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use crate::crawl::{CrawlConfig, Crawler};
use crate::extract::PageRecord;
use crate::summarize::{Summarizer, Teaser};
use crate::CrawlError;

pub struct RunConfig {
    pub seed_url: String,
    pub index_dir: PathBuf,
    pub force: bool,
    pub crawl: CrawlConfig,
    pub summarizer: Arc<Summarizer>,
}

/// Crawl a site and build, persist, and return its search index.
///
/// Fatal failures: an invalid or unreachable seed, and an existing index
/// destination without `force`. Per-page fetch and summarization faults
/// are absorbed along the way.
pub async fn run_crawl(config: RunConfig) -> Result<SearchIndex> {
    if index_exists(&config.index_dir) && !config.force {
        return Err(CrawlError::Index(IndexError::DestinationExists(
            config.index_dir.display().to_string(),
        ))
        .into());
    }

    let seed = Url::parse(&config.seed_url).map_err(|source| CrawlError::InvalidSeed {
        url: config.seed_url.clone(),
        source,
    })?;

    let crawler = Crawler::new(config.crawl.clone()).context("building http client")?;
    let records = crawler.run(&seed).await;
    if records.is_empty() {
        return Err(CrawlError::SeedUnreachable(config.seed_url).into());
    }

    let concurrency = config.crawl.concurrency;
    let teasers = summarize_all(config.summarizer, &records, concurrency).await;

    let mut builder = IndexBuilder::new();
    for (record, teaser) in records.iter().zip(teasers) {
        builder.add_page(
            record.url.as_str(),
            &record.title,
            &record.body_text,
            teaser.text,
            teaser.source,
        );
    }
    let index = builder.finish();

    let created_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    save_index(&config.index_dir, &index, config.force, created_at)
        .map_err(CrawlError::Index)?;
    Ok(index)
}

/// Second bounded-concurrency pass over the crawled records, one teaser per
/// record in record order. Keeps slow summarization calls from ever having
/// been on the crawl path.
async fn summarize_all(
    summarizer: Arc<Summarizer>,
    records: &[PageRecord],
    concurrency: usize,
) -> Vec<Teaser> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks: JoinSet<(usize, Teaser)> = JoinSet::new();
    for (i, record) in records.iter().enumerate() {
        let summarizer = summarizer.clone();
        let semaphore = semaphore.clone();
        let title = record.title.clone();
        let body = record.body_text.clone();
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore open");
            (i, summarizer.summarize(&title, &body).await)
        });
    }

    let mut teasers: Vec<Option<Teaser>> = (0..records.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((i, teaser)) => teasers[i] = Some(teaser),
            Err(err) => tracing::warn!(error = %err, "summarizer worker panicked"),
        }
    }
    // a panicked worker leaves a hole; fill it with the infallible fallback
    let budget = summarizer.budget();
    teasers
        .into_iter()
        .zip(records)
        .map(|(teaser, record)| match teaser {
            Some(t) => t,
            None => Teaser {
                text: crate::summarize::truncate_teaser(&record.body_text, budget),
                source: ferret_core::TeaserSource::Truncated,
            },
        })
        .collect()
}
