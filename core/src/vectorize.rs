//! TF-IDF weighting of indexed documents and queries.
//!
//! `weight = (1 + log10(tf)) * log10(N / df)`, with `N` the number of indexed
//! documents and `df` the number of documents containing the term.

use crate::index::InvertedIndex;
use crate::tokenizer::tokenize;
use crate::DocId;
use std::collections::BTreeMap;

/// Term -> weight. Sorted so that dot products sum in a fixed order.
pub type TermVector = BTreeMap<String, f32>;

pub fn idf(total_docs: usize, df: usize) -> f32 {
    (total_docs as f32 / df as f32).log10()
}

pub fn tf_weight(tf: u32) -> f32 {
    if tf == 0 { 0.0 } else { 1.0 + (tf as f32).log10() }
}

/// One vector per indexed document. Documents without terms get an empty vector,
/// and terms found in every document keep a zero weight.
pub fn build_document_vectors(index: &InvertedIndex, total_docs: usize) -> BTreeMap<DocId, TermVector> {
    let mut vectors: BTreeMap<DocId, TermVector> = index.doc_ids().map(|id| (id, TermVector::new())).collect();
    for (term, plist) in index.iter() {
        let idf = idf(total_docs, plist.len());
        for (&doc_id, &tf) in plist {
            vectors.entry(doc_id).or_default().insert(term.to_owned(), tf_weight(tf) * idf);
        }
    }
    vectors
}

/// Weight the query terms against the corpus statistics. Terms the corpus has
/// never seen are left out.
pub fn build_query_vector(query: &str, index: &InvertedIndex, total_docs: usize) -> TermVector {
    let mut tf_q: BTreeMap<String, u32> = BTreeMap::new();
    for term in tokenize(query) {
        *tf_q.entry(term).or_insert(0) += 1;
    }
    tf_q.into_iter()
        .filter_map(|(term, tf)| {
            let df = index.document_frequency(&term);
            if df == 0 { return None; }
            let weight = tf_weight(tf) * idf(total_docs, df);
            Some((term, weight))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool { (a - b).abs() < 1e-4 }

    #[test]
    fn tf_weight_is_logarithmic() {
        assert_eq!(tf_weight(0), 0.0);
        assert_eq!(tf_weight(1), 1.0);
        assert!(close(tf_weight(10), 2.0));
    }

    #[test]
    fn term_in_every_document_weighs_zero() {
        let mut index = InvertedIndex::new();
        index.update(1, ["egypt", "nile"]);
        index.update(2, ["egypt", "egypt"]);
        let n = index.num_docs();

        assert_eq!(idf(n, index.document_frequency("egypt")), 0.0);
        let vectors = build_document_vectors(&index, n);
        for v in vectors.values() {
            assert_eq!(v.get("egypt"), Some(&0.0));
        }
        assert!(close(vectors[&1]["nile"], 2f32.log10()));
    }

    #[test]
    fn query_repeats_raise_weight() {
        let mut index = InvertedIndex::new();
        index.update(1, ["sphinx"]);
        index.update(2, ["pyramid"]);
        let q = build_query_vector("sphinx sphinx pyramid", &index, 2);
        assert!(q["sphinx"] > q["pyramid"]);
        assert!(close(q["sphinx"], (1.0 + 2f32.log10()) * 2f32.log10()));
    }

    #[test]
    fn unknown_and_stop_terms_are_dropped_from_query() {
        let mut index = InvertedIndex::new();
        index.update(1, ["sphinx"]);
        index.update(2, ["pyramid"]);
        let q = build_query_vector("the sphinx of giza", &index, 2);
        assert_eq!(q.keys().collect::<Vec<_>>(), vec!["sphinx"]);
        assert!(build_query_vector("of the", &index, 2).is_empty());
    }

    #[test]
    fn empty_documents_get_empty_vectors() {
        let mut index = InvertedIndex::new();
        index.update(1, ["obelisk"]);
        index.update(2, Vec::<&str>::new());
        let vectors = build_document_vectors(&index, 2);
        assert_eq!(vectors.len(), 2);
        assert!(vectors[&2].is_empty());
    }
}
