use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Raw term frequency per document, ordered by doc id.
pub type PostingList = BTreeMap<DocId, u32>;

/// Term -> (doc -> frequency) postings plus the set of documents that were indexed.
///
/// A term is only ever present with at least one posting of frequency >= 1.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: HashMap<String, PostingList>,
    docs: BTreeSet<DocId>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Count every term of `terms` against `doc_id`.
    ///
    /// Not idempotent: feeding the same document twice doubles its counts, so
    /// callers apply each document exactly once and as a whole.
    pub fn update<I, S>(&mut self, doc_id: DocId, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.docs.insert(doc_id);
        for term in terms {
            let term = term.as_ref();
            if let Some(plist) = self.postings.get_mut(term) {
                *plist.entry(doc_id).or_insert(0) += 1;
            } else {
                self.postings.entry(term.to_owned()).or_default().insert(doc_id, 1);
            }
        }
    }

    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, |p| p.len())
    }

    pub fn term_frequency(&self, term: &str, doc_id: DocId) -> u32 {
        self.postings
            .get(term)
            .and_then(|p| p.get(&doc_id))
            .copied()
            .unwrap_or(0)
    }

    pub fn postings(&self, term: &str) -> Option<&PostingList> { self.postings.get(term) }

    pub fn terms(&self) -> impl Iterator<Item = &str> { self.postings.keys().map(String::as_str) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PostingList)> {
        self.postings.iter().map(|(t, p)| (t.as_str(), p))
    }

    /// Ids of every document passed to [`update`](Self::update), including those with no terms.
    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ { self.docs.iter().copied() }

    pub fn num_docs(&self) -> usize { self.docs.len() }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_frequencies_per_document() {
        let mut index = InvertedIndex::new();
        index.update(1, ["nile", "delta", "nile"]);
        index.update(2, ["nile"]);

        assert_eq!(index.document_frequency("nile"), 2);
        assert_eq!(index.document_frequency("delta"), 1);
        assert_eq!(index.term_frequency("nile", 1), 2);
        assert_eq!(index.term_frequency("nile", 2), 1);
        assert_eq!(index.term_frequency("delta", 2), 0);
        assert_eq!(index.term_frequency("sphinx", 1), 0);
        assert_eq!(index.num_terms(), 2);
    }

    #[test]
    fn empty_document_still_counts() {
        let mut index = InvertedIndex::new();
        index.update(1, Vec::<String>::new());
        index.update(2, ["karnak"]);
        assert_eq!(index.num_docs(), 2);
        assert_eq!(index.num_terms(), 1);
        assert_eq!(index.doc_ids().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn repeated_update_double_counts() {
        let mut index = InvertedIndex::new();
        index.update(7, ["temple"]);
        index.update(7, ["temple"]);
        assert_eq!(index.term_frequency("temple", 7), 2);
        assert_eq!(index.document_frequency("temple"), 1);
        assert_eq!(index.num_docs(), 1);
    }

    #[test]
    fn terms_present_only_when_indexed() {
        let mut index = InvertedIndex::new();
        assert!(index.is_empty());
        assert!(index.postings("obelisk").is_none());
        index.update(3, ["obelisk"]);
        let mut terms: Vec<&str> = index.terms().collect();
        terms.sort();
        assert_eq!(terms, vec!["obelisk"]);
        assert_eq!(index.postings("obelisk").map(|p| p.len()), Some(1));
    }
}
