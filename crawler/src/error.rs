use serde::Serialize;
use thiserror::Error;

/// Why a page could not be turned into a document. Never fatal to a crawl.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("page too large: {0} bytes")]
    TooLarge(usize),
    #[error("disallowed by robots.txt")]
    RobotsDisallowed,
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// An abandoned address and the reason, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub address: String,
    pub reason: String,
}
