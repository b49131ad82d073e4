use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::{Similarity, SimilarityBackend, SimilarityMode};

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Lowercase word tokens (alphanumeric/underscore runs) as a set.
pub fn tokenize(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// `|A ∩ B| / |A ∪ B|` over token sets; 0.0 when either side has no tokens.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a_tokens = tokenize(a);
    let b_tokens = tokenize(b);
    if a_tokens.is_empty() || b_tokens.is_empty() {
        return 0.0;
    }
    let intersection = a_tokens.intersection(&b_tokens).count();
    let union = a_tokens.union(&b_tokens).count();
    intersection as f64 / union as f64
}

/// Jaccard-only backend. Used when no embedding service is reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalSimilarity;

impl SimilarityBackend for LexicalSimilarity {
    fn similarity(&self, a: &str, b: &str) -> Similarity {
        Similarity {
            value: jaccard_similarity(a, b),
            mode: SimilarityMode::Jaccard,
        }
    }

    fn label(&self) -> String {
        "jaccard".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(jaccard_similarity("python developer", "python developer"), 1.0);
    }

    #[test]
    fn test_case_and_punctuation_ignored() {
        assert_eq!(jaccard_similarity("Python, Developer!", "python developer"), 1.0);
    }

    #[test]
    fn test_partial_overlap() {
        // {python, sql} vs {python, java, sql, go}: 2 / 4
        let s = jaccard_similarity("python sql", "python java sql go");
        assert!((s - 0.5).abs() < f64::EPSILON, "got {s}");
    }

    #[test]
    fn test_empty_side_scores_zero() {
        assert_eq!(jaccard_similarity("", "python"), 0.0);
        assert_eq!(jaccard_similarity("python", "   "), 0.0);
        assert_eq!(jaccard_similarity("!!!", "python"), 0.0);
    }

    #[test]
    fn test_symmetry_over_sample_pairs() {
        let samples = [
            "",
            "python",
            "Built REST APIs in Python and SQL",
            "Looking for a Python developer with SQL experience",
            "AWS certified solutions architect",
            "c++ / rust / go",
        ];
        for a in samples {
            for b in samples {
                assert_eq!(
                    jaccard_similarity(a, b),
                    jaccard_similarity(b, a),
                    "asymmetric for {a:?} / {b:?}"
                );
            }
        }
    }

    #[test]
    fn test_duplicates_do_not_inflate() {
        assert_eq!(jaccard_similarity("sql sql sql", "sql"), 1.0);
    }

    #[test]
    fn test_backend_reports_jaccard_mode() {
        let s = LexicalSimilarity.similarity("a b", "b c");
        assert_eq!(s.mode, SimilarityMode::Jaccard);
        assert!((s.value - 1.0 / 3.0).abs() < 1e-12);
    }
}
