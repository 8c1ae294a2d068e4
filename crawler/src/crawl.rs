use crate::cancel::CancelToken;
use crate::config::CrawlConfig;
use crate::error::{FetchError, FetchFailure};
use crate::fetcher::{Page, PageFetcher};
use crate::frontier::Frontier;
use crate::pacer::{origin_of, Pacer};
use search_core::tokenizer::tokenize_opt;
use search_core::{Corpus, DocMeta};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use time::format_description::well_known::Rfc3339;
use tokio::task::{self, JoinSet};

/// Everything a finished (or cancelled) crawl produced.
#[derive(Debug)]
pub struct CrawlReport {
    pub corpus: Corpus,
    pub failures: Vec<FetchFailure>,
    /// Candidate addresses dropped for falling outside the allowed prefix.
    pub out_of_scope: usize,
    /// Addresses left in the queue when the crawl stopped.
    pub unvisited: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
}

// None: cancelled before the fetch started.
type FetchOutcome = (String, Option<Result<Page, FetchError>>);

pub struct Crawler<F> {
    config: CrawlConfig,
    fetcher: Arc<F>,
    pacer: Arc<Pacer>,
    cancel: CancelToken,
}

impl<F: PageFetcher + 'static> Crawler<F> {
    pub fn new(config: CrawlConfig, fetcher: F) -> Self {
        let pacer = Arc::new(Pacer::new(config.politeness_interval));
        Self { config, fetcher: Arc::new(fetcher), pacer, cancel: CancelToken::new() }
    }

    /// Pace page fetches with `pacer`, so a fetcher holding the same pacer
    /// (see [`HttpFetcher::with_pacer`](crate::HttpFetcher::with_pacer)) shares its slots.
    pub fn with_pacer(mut self, pacer: Arc<Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn config(&self) -> &CrawlConfig { &self.config }

    /// Cancelling this token stops the crawl; fetches still waiting on the pacer never start.
    pub fn cancel_token(&self) -> CancelToken { self.cancel.clone() }

    pub async fn crawl(&self, seed: &str) -> CrawlReport {
        self.crawl_into(seed, Corpus::new()).await
    }

    /// Breadth-first crawl from `seed`, indexing each fetched page into `corpus`.
    /// Documents already in `corpus` do not count toward `max_documents`.
    ///
    /// Workers only fetch. Claiming addresses, assigning ids and index updates all
    /// happen here, one page at a time.
    pub async fn crawl_into(&self, seed: &str, mut corpus: Corpus) -> CrawlReport {
        let started = Instant::now();
        let max_docs = self.config.max_documents;
        let concurrency = self.config.concurrency.max(1);
        let mut frontier = Frontier::new(self.config.allowed_prefix.clone());
        let mut failures = Vec::new();
        let mut workers: JoinSet<FetchOutcome> = JoinSet::new();
        let mut claimed: HashMap<task::Id, String> = HashMap::new();
        let mut produced = 0usize;
        let mut cancelled = false;

        frontier.push(seed);
        tracing::info!(
            seed,
            max_docs,
            concurrency,
            prefix = %self.config.allowed_prefix,
            politeness_ms = self.config.politeness_interval.as_millis() as u64,
            "crawl started"
        );

        loop {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            // Never have more fetches in flight than documents still allowed.
            while workers.len() < concurrency && produced + workers.len() < max_docs {
                let Some(address) = frontier.claim() else { break };
                let id = self.spawn_fetch(&mut workers, address.clone());
                claimed.insert(id, address);
            }
            if workers.is_empty() {
                break;
            }

            let joined = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                joined = workers.join_next_with_id() => joined,
            };
            let (address, outcome) = match joined {
                Some(Ok((id, done))) => {
                    claimed.remove(&id);
                    done
                }
                Some(Err(e)) => {
                    // A panicked worker still owns its claim; settle it as a failure.
                    let Some(address) = claimed.remove(&e.id()) else {
                        tracing::error!(error = %e, "fetch task failed");
                        continue;
                    };
                    tracing::error!(url = %address, error = %e, "fetch task failed");
                    frontier.abandon(&address);
                    failures.push(FetchFailure { address, reason: e.to_string() });
                    continue;
                }
                None => break,
            };

            match outcome {
                None => {
                    cancelled = true;
                    break;
                }
                Some(Err(e)) => {
                    tracing::warn!(url = %address, error = %e, "fetch failed");
                    frontier.abandon(&address);
                    failures.push(FetchFailure { address, reason: e.to_string() });
                }
                Some(Ok(page)) => {
                    frontier.complete(&address);
                    let tokens = tokenize_opt(page.text.as_deref());
                    let terms = tokens.len();
                    let meta = DocMeta { url: address.clone(), title: page.title, fetched_at: now_rfc3339() };
                    let doc_id = corpus.add_document(meta, tokens);
                    produced += 1;
                    tracing::info!(doc_id, url = %address, terms, links = page.links.len(), "indexed page");
                    for link in &page.links {
                        frontier.push(link);
                    }
                }
            }
        }
        workers.shutdown().await;

        let report = CrawlReport {
            corpus,
            failures,
            out_of_scope: frontier.out_of_scope(),
            unvisited: frontier.len(),
            cancelled,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            documents = report.corpus.len(),
            failures = report.failures.len(),
            unvisited = report.unvisited,
            cancelled,
            elapsed_s = report.elapsed.as_secs_f64(),
            "crawl finished"
        );
        report
    }

    fn spawn_fetch(&self, workers: &mut JoinSet<FetchOutcome>, address: String) -> task::Id {
        let fetcher = self.fetcher.clone();
        let pacer = self.pacer.clone();
        let cancel = self.cancel.clone();
        workers
            .spawn(async move {
                if !pacer.wait(&origin_of(&address), &cancel).await {
                    return (address, None);
                }
                let result = fetcher.fetch(&address).await;
                (address, Some(result))
            })
            .id()
    }
}

fn now_rfc3339() -> Option<String> {
    time::OffsetDateTime::now_utc().format(&Rfc3339).ok()
}
