use crate::index::InvertedIndex;
use crate::rank::rank;
use crate::vectorize::{build_document_vectors, build_query_vector};
use crate::{DocId, DocMeta, Document};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Ranking cutoff.
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self { Self { top_k: 10 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f32,
    pub url: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    /// Documents with a positive score, before truncation.
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

/// Indexed documents and their inverted index. Owns id assignment, so every
/// document reaches the index exactly once.
#[derive(Debug)]
pub struct Corpus {
    config: SearchConfig,
    index: InvertedIndex,
    docs: BTreeMap<DocId, Document>,
    next_doc_id: DocId,
}

impl Default for Corpus {
    fn default() -> Self { Self::new() }
}

impl Corpus {
    pub fn new() -> Self { Self::with_config(SearchConfig::default()) }

    pub fn with_config(config: SearchConfig) -> Self {
        Self { config, index: InvertedIndex::new(), docs: BTreeMap::new(), next_doc_id: 1 }
    }

    pub fn config(&self) -> &SearchConfig { &self.config }

    /// Assign the next id, index `tokens` under it and keep the document.
    pub fn add_document(&mut self, meta: DocMeta, tokens: Vec<String>) -> DocId {
        let doc_id = self.next_doc_id;
        self.next_doc_id += 1;
        self.index.update(doc_id, &tokens);
        tracing::debug!(doc_id, url = %meta.url, terms = tokens.len(), "document indexed");
        self.docs.insert(doc_id, Document { id: doc_id, meta, tokens });
        doc_id
    }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn get(&self, doc_id: DocId) -> Option<&Document> { self.docs.get(&doc_id) }

    pub fn documents(&self) -> impl Iterator<Item = &Document> { self.docs.values() }

    /// doc id -> source address, for presenting results.
    pub fn addresses(&self) -> BTreeMap<DocId, &str> {
        self.docs.iter().map(|(id, d)| (*id, d.url())).collect()
    }

    /// Every token of every document in id order. Debug view only.
    pub fn all_tokens(&self) -> impl Iterator<Item = &str> {
        self.docs.values().flat_map(|d| d.tokens.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn search(&self, query: &str) -> SearchResults { self.search_top(query, self.config.top_k) }

    /// Rank all documents against `query` by TF-IDF cosine similarity.
    pub fn search_top(&self, query: &str, k: usize) -> SearchResults {
        let n = self.index.num_docs();
        let doc_vectors = build_document_vectors(&self.index, n);
        let q_vector = build_query_vector(query, &self.index, n);
        let ranked = rank(&doc_vectors, &q_vector, doc_vectors.len());
        let total_hits = ranked.iter().filter(|(_, score)| *score > 0.0).count();

        let results = ranked
            .into_iter()
            .take(k)
            .filter_map(|(doc_id, score)| {
                self.docs.get(&doc_id).map(|d| SearchHit {
                    doc_id,
                    score,
                    url: d.meta.url.clone(),
                    title: d.meta.title.clone(),
                })
            })
            .collect();
        SearchResults { query: query.to_string(), total_hits, results }
    }
}
