//! Matching engine: scores one resume against many job descriptions and
//! ranks the postings.
//!
//! Every call fits its own feature space over exactly the resume plus the
//! descriptions it was given (see `tfidf`). Nothing is cached between calls,
//! so the engine is a plain value that can be copied into any front end.

use serde::{Deserialize, Serialize};

use crate::matching::graph::{build_match_graph, MatchGraph};
use crate::matching::tfidf::{cosine_similarity, FeatureSpace};
use crate::models::records::{Company, Worker};

/// Number of postings returned by a ranking when the caller does not ask
/// for a specific count.
pub const DEFAULT_TOP_K: usize = 5;

/// Minimum similarity (exclusive) for a worker/job pair to become a graph edge.
pub const DEFAULT_EDGE_THRESHOLD: f64 = 0.01;

/// One ranked job posting for a resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub job_type: String,
    pub name: String,
    pub score: f64, // 0.0 – 1.0
}

impl RankedMatch {
    /// Score as a percentage rounded to two decimals, e.g. `42.87`.
    pub fn percent(&self) -> f64 {
        (self.score * 100.0 * 100.0).round() / 100.0
    }
}

/// Defaults shared by the front ends. The scoring itself is stateless.
#[derive(Debug, Clone, Copy)]
pub struct MatchingEngine {
    pub top_k: usize,
    pub edge_threshold: f64,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
        }
    }
}

impl MatchingEngine {
    pub fn new(top_k: usize, edge_threshold: f64) -> Self {
        Self {
            top_k,
            edge_threshold,
        }
    }

    /// Ranks `jobs` for `resume` using the configured `top_k`.
    pub fn rank(&self, resume: &str, jobs: &[Company]) -> Vec<RankedMatch> {
        rank_top_k(resume, jobs, self.top_k)
    }

    /// Builds the worker × job graph using the configured edge threshold.
    pub fn graph(&self, workers: &[Worker], jobs: &[Company]) -> MatchGraph {
        build_match_graph(workers, jobs, self.edge_threshold)
    }
}

/// Scores `resume` against every description, in input order.
///
/// The returned vector always has `descriptions.len()` entries, each in
/// [0.0, 1.0]. A corpus without any usable term scores all zeros.
pub fn score_all<S: AsRef<str>>(resume: &str, descriptions: &[S]) -> Vec<f64> {
    if descriptions.is_empty() {
        return Vec::new();
    }

    let mut corpus: Vec<&str> = Vec::with_capacity(descriptions.len() + 1);
    corpus.push(resume);
    corpus.extend(descriptions.iter().map(|d| d.as_ref()));

    let space = FeatureSpace::fit(&corpus);
    let vectors = space.vectors();
    let (resume_vector, description_vectors) = match vectors.split_first() {
        Some(split) => split,
        None => return vec![0.0; descriptions.len()],
    };

    tracing::debug!(
        descriptions = descriptions.len(),
        vocabulary = space.vocabulary_len(),
        "fitted feature space"
    );

    description_vectors
        .iter()
        .map(|vector| cosine_similarity(resume_vector, vector))
        .collect()
}

/// Returns the `k` best-scoring postings for `resume`, highest first.
/// Equal scores keep the order in which the postings were given.
pub fn rank_top_k(resume: &str, jobs: &[Company], k: usize) -> Vec<RankedMatch> {
    let descriptions: Vec<&str> = jobs.iter().map(|job| job.description.as_str()).collect();
    let scores = score_all(resume, &descriptions);

    let mut indexed: Vec<(usize, f64)> = scores.into_iter().enumerate().collect();
    // sort_by is stable: ties stay in posting order
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));

    indexed
        .into_iter()
        .take(k)
        .map(|(index, score)| {
            let job = &jobs[index];
            RankedMatch {
                job_type: job.job_type.clone(),
                name: job.name.clone(),
                score,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(name: &str, job_type: &str, description: &str) -> Company {
        Company {
            name: name.to_string(),
            job_type: job_type.to_string(),
            description: description.to_string(),
            location: "Remote".to_string(),
        }
    }

    fn sample_jobs() -> Vec<Company> {
        vec![
            company("Acme", "Data Analyst", "Looking for Python and SQL skills"),
            company("Bistro", "Chef", "Culinary expert needed"),
        ]
    }

    #[test]
    fn test_score_all_preserves_length() {
        for n in 0..6 {
            let descriptions: Vec<String> =
                (0..n).map(|i| format!("rust backend role {i}")).collect();
            assert_eq!(score_all("rust engineer", &descriptions).len(), n);
        }
    }

    #[test]
    fn test_score_all_empty_descriptions() {
        let empty: [&str; 0] = [];
        assert!(score_all("anything", &empty).is_empty());
    }

    #[test]
    fn test_scores_within_unit_interval() {
        let scores = score_all(
            "python python sql data",
            &["python", "sql data python", "chef", "", "python python sql data"],
        );
        for score in scores {
            assert!((0.0..=1.0).contains(&score), "score was {score}");
        }
    }

    #[test]
    fn test_degenerate_corpus_scores_zero() {
        assert_eq!(score_all("", &["", ""]), vec![0.0, 0.0]);
        assert_eq!(score_all("rust", &["", "  "]), vec![0.0, 0.0]);
        assert_eq!(score_all("", &["rust developer"]), vec![0.0]);
    }

    #[test]
    fn test_identical_text_scores_highest() {
        let resume = "rust tokio distributed systems";
        let scores = score_all(
            resume,
            &[
                "rust web services",
                "rust tokio distributed systems",
                "distributed systems in go",
            ],
        );
        let max = scores.iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(scores[1], max);
        assert!((scores[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_all_is_idempotent() {
        let descriptions = ["python sql", "sql server admin", "ml with python"];
        let first = score_all("python data sql", &descriptions);
        let second = score_all("python data sql", &descriptions);
        assert_eq!(first, second);
    }

    #[test]
    fn test_data_analyst_beats_chef() {
        let jobs = sample_jobs();
        let descriptions: Vec<&str> = jobs.iter().map(|j| j.description.as_str()).collect();
        let scores = score_all("Python data analysis SQL", &descriptions);
        assert!(scores[0] > 0.2, "analyst score was {}", scores[0]);
        assert_eq!(scores[1], 0.0);

        let ranked = rank_top_k("Python data analysis SQL", &jobs, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].job_type, "Data Analyst");
        assert_eq!(ranked[0].name, "Acme");
        assert_eq!(ranked[1].job_type, "Chef");
    }

    #[test]
    fn test_unrelated_posting_scores_positive_zero() {
        let jobs = sample_jobs();
        let ranked = rank_top_k("Python data analysis SQL", &jobs, 2);
        let chef = &ranked[1];

        assert!(!chef.score.is_sign_negative(), "chef score was {:?}", chef.score);
        assert_eq!(chef.percent().to_string(), "0");
        assert_eq!(serde_json::to_string(&chef.score).unwrap(), "0.0");
    }

    #[test]
    fn test_rank_top_k_empty_jobs() {
        assert!(rank_top_k("Python data analysis SQL", &[], 5).is_empty());
    }

    #[test]
    fn test_rank_top_k_returns_min_of_k_and_len() {
        let jobs: Vec<Company> = (0..7)
            .map(|i| company(&format!("C{i}"), "Dev", &format!("rust job {i}")))
            .collect();
        assert_eq!(rank_top_k("rust", &jobs, 5).len(), 5);
        assert_eq!(rank_top_k("rust", &jobs, 10).len(), 7);
        assert_eq!(rank_top_k("rust", &jobs, 0).len(), 0);
    }

    #[test]
    fn test_rank_top_k_sorted_and_stable() {
        let jobs = vec![
            company("First", "Cook", "pastry baking"),
            company("Second", "Dev", "rust rust"),
            company("Third", "Cook", "pastry baking"),
            company("Fourth", "Dev", "rust rust"),
        ];
        let ranked = rank_top_k("rust", &jobs, 4);

        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        let names: Vec<&str> = ranked.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "Fourth", "First", "Third"]);
    }

    #[test]
    fn test_rank_top_k_leaves_input_untouched() {
        let jobs = sample_jobs();
        let before = jobs.clone();
        let _ = rank_top_k("Python data analysis SQL", &jobs, 1);
        assert_eq!(jobs, before);
    }

    #[test]
    fn test_percent_rounds_to_two_decimals() {
        let m = RankedMatch {
            job_type: "Dev".to_string(),
            name: "Acme".to_string(),
            score: 0.428_765,
        };
        assert_eq!(m.percent(), 42.88);
    }

    #[test]
    fn test_engine_uses_configured_top_k() {
        let jobs: Vec<Company> = (0..4)
            .map(|i| company(&format!("C{i}"), "Dev", "rust"))
            .collect();
        let engine = MatchingEngine::new(2, DEFAULT_EDGE_THRESHOLD);
        assert_eq!(engine.rank("rust", &jobs).len(), 2);
        assert_eq!(MatchingEngine::default().top_k, DEFAULT_TOP_K);
    }
}
