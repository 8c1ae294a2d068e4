use std::time::Duration;

pub const DEFAULT_SEED: &str = "https://en.wikipedia.org/wiki/List_of_pharaohs";
pub const DEFAULT_PREFIX: &str = "https://en.wikipedia.org";

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Only addresses starting with this text are fetched or queued.
    pub allowed_prefix: String,
    /// Documents one crawl may add.
    pub max_documents: usize,
    /// Minimum spacing between two fetches to the same origin.
    pub politeness_interval: Duration,
    /// Fetch workers; 1 keeps the crawl strictly sequential.
    pub concurrency: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            allowed_prefix: DEFAULT_PREFIX.to_string(),
            max_documents: 10,
            politeness_interval: Duration::from_millis(1000),
            concurrency: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_page_bytes: usize,
    /// CSS selector for the main text; a page without a match yields no text.
    pub content_selector: String,
    pub respect_robots: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout: Duration::from_secs(12),
            max_page_bytes: 2 * 1024 * 1024,
            content_selector: "#mw-content-text".to_string(),
            respect_robots: false,
        }
    }
}

pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
