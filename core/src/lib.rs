pub mod corpus;
pub mod index;
pub mod rank;
pub mod tokenizer;
pub mod vectorize;

use serde::{Deserialize, Serialize};

pub use corpus::{Corpus, SearchConfig, SearchHit, SearchResults};
pub use index::{InvertedIndex, PostingList};
pub use vectorize::TermVector;

/// Document ids start at 1 and are never reused within a corpus.
pub type DocId = u32;

/// Descriptive fields of a fetched page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMeta {
    pub url: String,
    pub title: Option<String>,
    /// RFC 3339 timestamp of the successful fetch.
    pub fetched_at: Option<String>,
}

impl DocMeta {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Self::default() }
    }
}

/// An indexed page. Immutable once created by [`Corpus::add_document`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    #[serde(flatten)]
    pub meta: DocMeta,
    pub tokens: Vec<String>,
}

impl Document {
    pub fn url(&self) -> &str { &self.meta.url }
}
