pub mod crawl;
pub mod extract;
pub mod fetch;
pub mod frontier;
pub mod pipeline;
pub mod summarize;

pub use crawl::{CrawlConfig, Crawler};
pub use extract::{extract, PageRecord};
pub use fetch::Fetcher;
pub use frontier::{CrawlScope, Frontier, FrontierEntry};
pub use pipeline::{run_crawl, RunConfig};
pub use summarize::{RemoteConfig, Summarizer, Teaser};

use thiserror::Error;

/// Per-URL fetch failures. Recovered by dropping the URL: logged, never
/// retried, never fatal to the crawl as a whole.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("http status {0}")]
    Status(u16),

    #[error("not an html response: {0}")]
    NotHtml(String),

    #[error("response body too large: {0} bytes")]
    TooLarge(usize),
}

/// Failures that abort a crawl run. Everything per-page is absorbed; only
/// a bad seed, an unreachable seed, or an index destination conflict
/// surface to the caller.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed url {url}: {source}")]
    InvalidSeed {
        url: String,
        source: url::ParseError,
    },

    #[error("seed url {0} yielded no pages")]
    SeedUnreachable(String),

    #[error(transparent)]
    Index(#[from] ferret_core::IndexError),
}
