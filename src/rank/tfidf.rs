//! TF-IDF relevance ranking.
//!
//! Each call fits a fresh vector space over `{reference} ∪ candidates`, so
//! scores are only comparable within one call. Weighting follows the usual
//! smoothed scheme:
//!
//! ```text
//! tf(t, d)  = raw count of t in d
//! idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//! w(t, d)   = tf(t, d) * idf(t), then L2-normalized per document
//! score(d)  = cosine(w(reference), w(d))   ∈ [0, 1]
//! ```
//!
//! Tokens are lowercased runs of two or more word characters.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::models::{ResourceHit, SearchCandidate};

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// An item the ranker can score.
pub trait Rankable {
    /// Text compared against the reference.
    fn scoring_text(&self) -> &str;
    fn set_score(&mut self, score: f32);
}

impl Rankable for SearchCandidate {
    fn scoring_text(&self) -> &str {
        &self.snippet
    }

    fn set_score(&mut self, score: f32) {
        self.score = Some(score);
    }
}

impl Rankable for ResourceHit {
    fn scoring_text(&self) -> &str {
        &self.resource.description
    }

    fn set_score(&mut self, score: f32) {
        self.score = Some(score);
    }
}

/// Score every candidate against `reference` and sort by descending score.
///
/// Ties keep their input order. An empty reference or an empty candidate list
/// yields an empty result.
pub fn rank<T: Rankable>(reference: &str, candidates: Vec<T>) -> Vec<T> {
    if reference.trim().is_empty() || candidates.is_empty() {
        return Vec::new();
    }

    let scores = similarity_scores(reference, candidates.iter().map(|c| c.scoring_text()));

    let mut scored: Vec<(f32, T)> = scores.into_iter().zip(candidates).collect();
    // Vec::sort_by is stable
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .map(|(score, mut item)| {
            item.set_score(score);
            item
        })
        .collect()
}

/// Cosine similarity of each document to `reference` in a TF-IDF space fitted
/// on all of them. Output is parallel with `documents`.
pub fn similarity_scores<'a>(
    reference: &str,
    documents: impl IntoIterator<Item = &'a str>,
) -> Vec<f32> {
    let reference_counts = term_counts(reference);
    let doc_counts: Vec<BTreeMap<String, usize>> =
        documents.into_iter().map(term_counts).collect();

    let n_docs = (doc_counts.len() + 1) as f64;
    let mut df: BTreeMap<&str, usize> = BTreeMap::new();
    for counts in std::iter::once(&reference_counts).chain(doc_counts.iter()) {
        for term in counts.keys() {
            *df.entry(term.as_str()).or_insert(0) += 1;
        }
    }
    let idf: BTreeMap<&str, f64> = df
        .into_iter()
        .map(|(term, df)| (term, ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0))
        .collect();

    let reference_vec = weigh(&reference_counts, &idf);

    doc_counts
        .iter()
        .map(|counts| {
            let doc_vec = weigh(counts, &idf);
            cosine(&reference_vec, &doc_vec)
        })
        .collect()
}

fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn term_counts(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// TF-IDF weights, L2-normalized. Empty documents stay empty.
fn weigh<'a>(
    counts: &'a BTreeMap<String, usize>,
    idf: &BTreeMap<&str, f64>,
) -> BTreeMap<&'a str, f64> {
    let mut weights: BTreeMap<&str, f64> = counts
        .iter()
        .map(|(term, &tf)| {
            let w = tf as f64 * idf.get(term.as_str()).copied().unwrap_or(1.0);
            (term.as_str(), w)
        })
        .collect();

    let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for w in weights.values_mut() {
            *w /= norm;
        }
    }
    weights
}

fn cosine(a: &BTreeMap<&str, f64>, b: &BTreeMap<&str, f64>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum();

    // Both sides are unit length; clamp away rounding drift.
    dot.clamp(0.0, 1.0) as f32
}
