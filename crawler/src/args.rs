use crate::config::{default_user_agent, CrawlConfig, FetcherConfig, DEFAULT_PREFIX, DEFAULT_SEED};
use crate::crawl::Crawler;
use crate::fetcher::HttpFetcher;
use crate::pacer::Pacer;
use clap::Args;
use search_core::SearchConfig;
use std::sync::Arc;
use std::time::Duration;

/// Crawl and ranking flags shared by the `crawler` and `server` binaries.
#[derive(Args, Debug, Clone)]
pub struct CrawlArgs {
    /// Address the crawl starts from
    #[arg(long, default_value = DEFAULT_SEED)]
    pub seed: String,
    /// Only addresses starting with this prefix are fetched
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,
    /// Maximum number of documents to fetch
    #[arg(long, default_value_t = 10)]
    pub max_docs: usize,
    /// Minimum milliseconds between fetches to one origin (politeness)
    #[arg(long, default_value_t = 1000)]
    pub politeness_ms: u64,
    /// Concurrency (number of fetch workers)
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,
    /// Number of ranked results per query
    #[arg(long, default_value_t = 10)]
    pub top_k: usize,
    /// Request timeout seconds
    #[arg(long, default_value_t = 12)]
    pub timeout_secs: u64,
    /// User-Agent string to use for crawling
    #[arg(long)]
    pub user_agent: Option<String>,
    /// CSS selector of the page's main text
    #[arg(long, default_value = "#mw-content-text")]
    pub content_selector: String,
    /// Skip pages disallowed by the host's robots.txt
    #[arg(long, default_value_t = false)]
    pub respect_robots: bool,
}

impl CrawlArgs {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            allowed_prefix: self.prefix.clone(),
            max_documents: self.max_docs,
            politeness_interval: Duration::from_millis(self.politeness_ms),
            concurrency: self.concurrency.max(1),
        }
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            user_agent: self.user_agent.clone().unwrap_or_else(default_user_agent),
            timeout: Duration::from_secs(self.timeout_secs),
            content_selector: self.content_selector.clone(),
            respect_robots: self.respect_robots,
            ..FetcherConfig::default()
        }
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig { top_k: self.top_k }
    }

    /// HTTP crawler whose page and robots.txt requests share one pacer.
    pub fn http_crawler(&self) -> anyhow::Result<Crawler<HttpFetcher>> {
        let config = self.crawl_config();
        let pacer = Arc::new(Pacer::new(config.politeness_interval));
        let fetcher = HttpFetcher::new(self.fetcher_config())?.with_pacer(pacer.clone());
        Ok(Crawler::new(config, fetcher).with_pacer(pacer))
    }
}
