use crate::vectorize::TermVector;
use crate::DocId;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub fn norm(v: &TermVector) -> f32 {
    v.values().map(|w| w * w).sum::<f32>().sqrt()
}

/// Sum of products over the terms both vectors share.
pub fn dot(a: &TermVector, b: &TermVector) -> f32 {
    a.iter().filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb)).sum()
}

/// Cosine similarity; 0 when either vector has zero length.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f32 {
    with_norms(a, norm(a), b, norm(b))
}

fn with_norms(a: &TermVector, norm_a: f32, b: &TermVector, norm_b: f32) -> f32 {
    let denom = norm_a * norm_b;
    if denom == 0.0 { return 0.0; }
    dot(a, b) / denom
}

/// Score every document against `query` and keep the best `k`.
///
/// Sorted by descending score; equal scores fall back to ascending doc id.
pub fn rank(document_vectors: &BTreeMap<DocId, TermVector>, query: &TermVector, k: usize) -> Vec<(DocId, f32)> {
    let q_norm = norm(query);
    let mut scored: Vec<(DocId, f32)> = document_vectors
        .iter()
        .map(|(&doc_id, v)| (doc_id, with_norms(v, norm(v), query, q_norm)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
    scored.truncate(k);
    scored
}
