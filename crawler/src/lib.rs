pub mod args;
pub mod cancel;
pub mod config;
pub mod crawl;
pub mod error;
pub mod fetcher;
pub mod frontier;
pub mod pacer;
pub mod robots;

pub use cancel::CancelToken;
pub use config::{CrawlConfig, FetcherConfig};
pub use crawl::{CrawlReport, Crawler};
pub use error::{FetchError, FetchFailure};
pub use fetcher::{HttpFetcher, Page, PageFetcher};
pub use frontier::Frontier;
pub use pacer::Pacer;
