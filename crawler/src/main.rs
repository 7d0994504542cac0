use anyhow::Result;
use clap::Parser;
use ferret_crawler::summarize::DEFAULT_TEASER_BUDGET;
use ferret_crawler::{run_crawl, CrawlConfig, RemoteConfig, RunConfig, Summarizer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "ferret-crawler")]
#[command(about = "Crawl a site from a seed URL and build its search index")]
struct Cli {
    /// Seed URL; the crawl stays on this host under the seed's path prefix
    #[arg(long)]
    seed_url: String,
    /// Index output directory
    #[arg(long, default_value = "./index")]
    index: String,
    /// Maximum number of pages to crawl
    #[arg(long, default_value_t = 200)]
    max_pages: usize,
    /// Maximum link depth from the seed
    #[arg(long, default_value_t = 8)]
    max_depth: u32,
    /// Overwrite an existing index at the destination
    #[arg(long, default_value_t = false)]
    force: bool,
    /// Concurrent fetches
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// User-Agent header for all requests
    #[arg(long, default_value = "ferret-crawler/0.1 (+https://example.invalid/bot)")]
    user_agent: String,
    /// Teaser character budget for the truncation fallback
    #[arg(long, default_value_t = DEFAULT_TEASER_BUDGET)]
    teaser_budget: usize,
}

/// Summarizer selection happens here, once: with `FERRET_SUMMARY_API_KEY`
/// set the remote service is used (with per-call fallback), without it
/// every teaser is truncated. Missing credentials are a configuration
/// state, not an error.
fn build_summarizer(cli: &Cli) -> Result<Summarizer> {
    match std::env::var("FERRET_SUMMARY_API_KEY") {
        Ok(api_key) if !api_key.is_empty() => {
            let api_base = std::env::var("FERRET_SUMMARY_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
            let model = std::env::var("FERRET_SUMMARY_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string());
            tracing::info!(%api_base, %model, "using remote summarization service");
            Ok(Summarizer::remote(
                RemoteConfig {
                    api_base,
                    api_key,
                    model,
                    timeout: Duration::from_secs(cli.timeout_secs),
                },
                cli.teaser_budget,
            )?)
        }
        _ => {
            tracing::info!("no summarization credentials, teasers will be truncated");
            Ok(Summarizer::truncate_only(cli.teaser_budget))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let summarizer = Arc::new(build_summarizer(&cli)?);
    let config = RunConfig {
        seed_url: cli.seed_url.clone(),
        index_dir: PathBuf::from(&cli.index),
        force: cli.force,
        crawl: CrawlConfig {
            max_pages: cli.max_pages,
            max_depth: cli.max_depth,
            concurrency: cli.concurrency,
            timeout: Duration::from_secs(cli.timeout_secs),
            user_agent: cli.user_agent.clone(),
        },
        summarizer,
    };

    let index = run_crawl(config).await?;
    tracing::info!(
        pages = index.num_docs,
        terms = index.dictionary.len(),
        dest = %cli.index,
        "crawl and index build finished"
    );
    Ok(())
}
