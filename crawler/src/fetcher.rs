use crate::config::FetcherConfig;
use crate::error::FetchError;
use crate::pacer::Pacer;
use crate::robots::RobotsCache;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use scraper::{Html, Selector};
use std::sync::Arc;
use url::Url;

/// What the crawl needs from a fetched page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub title: Option<String>,
    /// Extracted text; `None` when the page had no content element.
    pub text: Option<String>,
    /// Absolute outbound addresses, in document order.
    pub links: Vec<String>,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, address: &str) -> Result<Page, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
    config: FetcherConfig,
    selectors: PageSelectors,
    robots: RobotsCache,
    pacer: Option<Arc<Pacer>>,
}

impl HttpFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(config.timeout)
            .build()?;
        let selectors = PageSelectors::new(&config.content_selector)?;
        Ok(Self { client, config, selectors, robots: RobotsCache::new(), pacer: None })
    }

    /// Count robots.txt downloads against the crawl's pacer. Without one they
    /// go out unpaced.
    pub fn with_pacer(mut self, pacer: Arc<Pacer>) -> Self {
        self.pacer = Some(pacer);
        self
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, address: &str) -> Result<Page, FetchError> {
        let url = Url::parse(address).map_err(|_| FetchError::InvalidAddress(address.to_string()))?;
        if self.config.respect_robots {
            let pacer = self.pacer.as_deref();
            if !self.robots.allowed(&self.client, &url, &self.config.user_agent, pacer).await {
                return Err(FetchError::RobotsDisallowed);
            }
        }

        let resp = self.client.get(url.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }
        if let Some(ct) = resp.headers().get(header::CONTENT_TYPE) {
            if let Ok(v) = ct.to_str() {
                if !v.starts_with("text/html") {
                    return Err(FetchError::UnsupportedContentType(v.to_string()));
                }
            }
        }
        let bytes = resp.bytes().await?;
        if bytes.len() > self.config.max_page_bytes {
            return Err(FetchError::TooLarge(bytes.len()));
        }
        let body = String::from_utf8_lossy(&bytes);
        // Redirects may have moved us; links resolve against the requested address.
        Ok(self.selectors.extract(&body, &url))
    }
}

/// Parsed CSS selectors, built once per fetcher.
pub struct PageSelectors {
    content: Selector,
    title: Selector,
    anchor: Selector,
}

impl PageSelectors {
    pub fn new(content_selector: &str) -> Result<Self> {
        let parse = |s: &str| Selector::parse(s).map_err(|e| anyhow!("invalid selector {s:?}: {e}"));
        Ok(Self {
            content: parse(content_selector)?,
            title: parse("title")?,
            anchor: parse("a[href]")?,
        })
    }

    /// Pull title, main text and absolute http(s) links out of an HTML document.
    pub fn extract(&self, html: &str, base: &Url) -> Page {
        let doc = Html::parse_document(html);
        let title = doc
            .select(&self.title)
            .next()
            .map(|n| n.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());
        // No content element means no text, not the whole page.
        let text = doc
            .select(&self.content)
            .next()
            .map(|n| n.text().map(str::trim).filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" "));

        let mut links = Vec::new();
        for a in doc.select(&self.anchor) {
            if let Some(h) = a.value().attr("href") {
                if let Ok(u) = Url::parse(h).or_else(|_| base.join(h)) {
                    if u.scheme() == "http" || u.scheme() == "https" { links.push(u.to_string()); }
                }
            }
        }
        Page { title, text, links }
    }
}
