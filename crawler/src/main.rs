use anyhow::Result;
use clap::Parser;
use crawler::args::CrawlArgs;
use search_core::Corpus;
use std::io::{self, BufRead, BufWriter, Write};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Crawl a site into an in-memory TF-IDF index, then answer queries as JSON lines")]
struct Cli {
    #[command(flatten)]
    crawl: CrawlArgs,
    /// Query to run after crawling (repeatable); reads one query per stdin line when absent
    #[arg(long = "query", short = 'q')]
    queries: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    let crawler = cli.crawl.http_crawler()?;
    let cancel = crawler.cancel_token();
    let on_interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let report = crawler.crawl_into(&cli.crawl.seed, Corpus::with_config(cli.crawl.search_config())).await;
    on_interrupt.abort();
    for failure in &report.failures {
        tracing::debug!(url = %failure.address, reason = %failure.reason, "abandoned");
    }
    if report.cancelled {
        tracing::warn!(documents = report.corpus.len(), "crawl interrupted, searching what was indexed");
    }

    let corpus = Arc::new(report.corpus);
    let queries = cli.queries;
    let sink = tokio::task::spawn_blocking(move || answer_queries(&corpus, &queries));
    tokio::select! {
        res = sink => res??,
        _ = tokio::signal::ctrl_c() => {
            // stdin may be blocked in a read that never returns
            std::process::exit(130);
        }
    }
    Ok(())
}

/// Query channel: `--query` values, else stdin lines. Result sink: one JSON line per query on stdout.
fn answer_queries(corpus: &Corpus, queries: &[String]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if !queries.is_empty() {
        for q in queries {
            emit(&mut out, corpus, q)?;
        }
        return Ok(());
    }
    for line in io::stdin().lock().lines() {
        let line = line?;
        let q = line.trim();
        if q.is_empty() { continue; }
        emit(&mut out, corpus, q)?;
    }
    Ok(())
}

fn emit<W: Write>(out: &mut W, corpus: &Corpus, query: &str) -> Result<()> {
    let results = corpus.search(query);
    serde_json::to_writer(&mut *out, &results)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
