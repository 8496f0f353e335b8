//! Jointly fit TF-IDF feature space.
//!
//! A `FeatureSpace` is fit from scratch over the documents handed to it and
//! discarded afterwards. Vocabulary and idf weights therefore depend on the
//! whole corpus of a single call: the same resume/description pair can score
//! differently when the other descriptions change.
//!
//! Weighting follows the usual smoothed scheme:
//! - tf = raw term count in the document
//! - idf = ln((1 + n) / (1 + df)) + 1
//! - each document vector is L2-normalised
//!
//! Terms are kept in `BTreeMap`s so summation order never varies between
//! calls.

use std::collections::BTreeMap;

/// Minimum token length in characters. Single-character words are dropped.
const MIN_TOKEN_CHARS: usize = 2;

/// Sparse, L2-normalised term-weight vector.
pub type TermVector = BTreeMap<String, f64>;

/// Lowercases `text` and splits it into word tokens (runs of alphanumerics or
/// `_`) of at least two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

fn term_counts(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Feature space fit over one corpus. Holds one weighted vector per input
/// document, in input order.
#[derive(Debug, Clone)]
pub struct FeatureSpace {
    idf: BTreeMap<String, f64>,
    vectors: Vec<TermVector>,
}

impl FeatureSpace {
    /// Fits vocabulary and idf weights over `documents` and vectorises each
    /// of them. An empty corpus, or one without any token, yields an empty
    /// vocabulary and all-empty vectors.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let counts: Vec<BTreeMap<String, usize>> = documents
            .iter()
            .map(|doc| term_counts(doc.as_ref()))
            .collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n = counts.len() as f64;
        let idf: BTreeMap<String, f64> = document_frequency
            .into_iter()
            .map(|(term, df)| {
                let weight = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
                (term.to_string(), weight)
            })
            .collect();

        let vectors = counts
            .into_iter()
            .map(|doc| {
                let mut vector: TermVector = doc
                    .into_iter()
                    .map(|(term, count)| {
                        let weight = count as f64 * idf.get(&term).copied().unwrap_or(0.0);
                        (term, weight)
                    })
                    .collect();
                l2_normalize(&mut vector);
                vector
            })
            .collect();

        Self { idf, vectors }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }

    #[cfg(test)]
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Weighted vector of the `index`-th fitted document.
    #[cfg(test)]
    pub fn vector(&self, index: usize) -> Option<&TermVector> {
        self.vectors.get(index)
    }

    pub fn vectors(&self) -> &[TermVector] {
        &self.vectors
    }
}

fn l2_normalize(vector: &mut TermVector) {
    let norm = norm(vector);
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
}

fn norm(vector: &TermVector) -> f64 {
    vector.values().map(|w| w * w).sum::<f64>().sqrt()
}

/// Cosine similarity of two non-negative term vectors, clamped to [0, 1].
/// Returns 0.0 when either vector has no weight.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    // `fold` from +0.0: an empty `sum` of f64 yields -0.0.
    let dot = small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|other| w * other))
        .fold(0.0, |acc, x| acc + x);

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}
