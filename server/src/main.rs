use anyhow::Result;
use axum::Router;
use clap::Parser;
use crawler::args::CrawlArgs;
use parking_lot::RwLock;
use search_core::Corpus;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};
use server::build_app;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "server", about = "Crawl at startup, then serve TF-IDF search over HTTP")]
struct Args {
    #[command(flatten)]
    crawl: CrawlArgs,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let crawler = args.crawl.http_crawler()?;
    let cancel = crawler.cancel_token();
    let on_interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
    let report = crawler.crawl_into(&args.crawl.seed, Corpus::with_config(args.crawl.search_config())).await;
    on_interrupt.abort();
    if report.cancelled {
        tracing::warn!(documents = report.corpus.len(), "crawl interrupted");
        return Ok(());
    }

    let app: Router = build_app(Arc::new(RwLock::new(report.corpus)));
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
