//! Keyword engine — heuristic keyword extraction from resume fields and job descriptions.
//!
//! Candidates are 1–3 word grams over cleaned text, ranked by frequency plus a bonus
//! for known technology tokens and for multi-word phrases. Grams that begin or end on a
//! stop word are dropped, as are grams overlapping an already selected keyword.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::resume::ParsedResume;

/// Upper bound on candidates returned from a single text.
const MAX_CANDIDATES: usize = 60;
const TECH_BONUS: usize = 5;
const PHRASE_BONUS: usize = 1;

static TECH_TOKENS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "python", "java", "javascript", "typescript", "react", "reactjs", "node", "node.js",
        "express", "express.js", "django", "flask", "c++", "c", "c#", "go", "golang", "rust",
        "sql", "mysql", "postgres", "postgresql", "mongodb", "redis", "docker", "kubernetes",
        "aws", "gcp", "azure", "git", "ci/cd", "jenkins", "circleci", "heroku", "html", "css",
        "tailwind", "bootstrap", "figma", "postman", "rest", "graphql", "tensorflow", "pytorch",
        "opencv", "socket.io",
    ]
    .into_iter()
    .collect()
});

const SOFT_TOKENS: &[&str] = &[
    "leadership",
    "communication",
    "collaboration",
    "team",
    "agile",
    "scrum",
    "problem",
    "analysis",
    "design",
    "testing",
    "deployment",
    "optimization",
];

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "if", "in",
        "into", "is", "it", "no", "not", "of", "on", "or", "our", "such", "that", "the",
        "their", "then", "there", "these", "they", "this", "to", "was", "we", "will", "with",
        "you", "your",
    ]
    .into_iter()
    .collect()
});

/// Everything except word characters and `. + - /` (kept for `node.js`, `c++`, `ci/cd`).
static NON_KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w.+\-/]").expect("keyword character class is valid"));

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("numeric pattern is valid"));

/// Keywords grouped by kind, plus the flat ranked list used for scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordSet {
    pub technical_keywords: Vec<String>,
    pub domain_keywords: Vec<String>,
    pub soft_keywords: Vec<String>,
    pub top_keywords_flat: Vec<String>,
}

/// Lowercases and strips punctuation other than `. + - /`, collapsing whitespace.
pub fn clean_text(text: &str) -> String {
    let replaced = NON_KEYWORD_RE.replace_all(text, " ");
    replaced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_tech_token(word: &str) -> bool {
    TECH_TOKENS.contains(word) || TECH_TOKENS.contains(word.trim_matches('.'))
}

fn contains_tech_token(keyword: &str) -> bool {
    keyword.split_whitespace().any(is_tech_token)
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Ranked keyword candidates from free text, most important first.
pub fn extract_candidate_keywords(text: &str) -> Vec<String> {
    let cleaned = clean_text(text);
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    // (gram, frequency) in first-seen order, so equal scores keep a stable order.
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for n in [3usize, 2, 1] {
        if words.len() < n {
            continue;
        }
        for window in words.windows(n) {
            if is_stop_word(window[0]) || is_stop_word(window[n - 1]) {
                continue;
            }
            let gram = window.join(" ");
            if gram.chars().count() <= 1 {
                continue;
            }
            match index.get(&gram) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(gram.clone(), counts.len());
                    counts.push((gram, 1));
                }
            }
        }
    }

    let mut scored: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(gram, freq)| {
            let tech_hits = gram.split(' ').filter(|w| is_tech_token(w)).count();
            let phrase = if gram.contains(' ') { PHRASE_BONUS } else { 0 };
            let score = freq + tech_hits * TECH_BONUS + phrase;
            (gram, score)
        })
        .collect();

    // Stable sort: score desc, then longer grams first.
    scored.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| b.0.chars().count().cmp(&a.0.chars().count()))
    });

    let mut selected: Vec<String> = Vec::new();
    for (gram, _) in scored {
        let gram = gram.trim();
        if gram.chars().count() < 2 || NUMERIC_RE.is_match(gram) {
            continue;
        }
        if selected
            .iter()
            .any(|s| s.contains(gram) || gram.contains(s.as_str()))
        {
            continue;
        }
        selected.push(gram.to_string());
        if selected.len() >= MAX_CANDIDATES {
            break;
        }
    }
    selected
}

/// Sorts keywords into technical, soft, and domain buckets.
pub fn split_keywords_by_type(keywords: &[String]) -> KeywordSet {
    let mut set = KeywordSet {
        top_keywords_flat: keywords.to_vec(),
        ..Default::default()
    };

    for keyword in keywords {
        let lower = keyword.to_lowercase();
        if contains_tech_token(&lower) {
            set.technical_keywords.push(keyword.clone());
        } else if SOFT_TOKENS.iter().any(|s| lower.contains(s)) {
            set.soft_keywords.push(keyword.clone());
        } else if lower.contains(' ') {
            set.domain_keywords.push(keyword.clone());
        } else if lower.chars().count() <= 4 {
            // Short single words are usually acronyms or tool names.
            set.technical_keywords.push(keyword.clone());
        } else {
            set.domain_keywords.push(keyword.clone());
        }
    }
    set
}

/// Resume keywords: the listed skills first, then candidates mined from education and
/// experience lines.
pub fn generate_keywords_from_resume(parsed: &ParsedResume, top_n: usize) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut ranked: Vec<String> = Vec::new();

    for skill in &parsed.skills {
        let keyword = clean_text(skill);
        if !keyword.is_empty() && seen.insert(keyword.clone()) {
            ranked.push(keyword);
        }
    }

    let blob = parsed
        .education
        .iter()
        .chain(parsed.experience.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    for candidate in extract_candidate_keywords(&blob) {
        if seen.insert(candidate.clone()) {
            ranked.push(candidate);
        }
    }

    ranked.truncate(top_n);
    ranked
}

pub fn generate_keywords_from_jd(job_desc: &str, top_n: usize) -> Vec<String> {
    let mut candidates = extract_candidate_keywords(job_desc);
    candidates.truncate(top_n);
    candidates
}

/// Flat keyword list for scoring.
///
/// With a job description: resume keywords that overlap a JD keyword come first, then
/// the remaining resume keywords, then the JD keywords; duplicates (case-insensitive)
/// are dropped and the list is capped at `top_n`. Without one, the resume keywords.
pub fn best_keywords_for_scoring(parsed: &ParsedResume, job_desc: &str, top_n: usize) -> Vec<String> {
    let resume_keywords = generate_keywords_from_resume(parsed, top_n);
    if job_desc.trim().is_empty() {
        return resume_keywords;
    }

    let jd_keywords = generate_keywords_from_jd(job_desc, top_n);
    let overlaps = |k: &str| {
        let k = k.to_lowercase();
        jd_keywords.iter().any(|j| {
            let j = j.to_lowercase();
            j.contains(&k) || k.contains(&j)
        })
    };

    let (common, rest): (Vec<&String>, Vec<&String>) =
        resume_keywords.iter().partition(|k| overlaps(k.as_str()));

    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::new();
    for keyword in common.into_iter().chain(rest).chain(jd_keywords.iter()) {
        if result.len() >= top_n {
            break;
        }
        if seen.insert(keyword.to_lowercase()) {
            result.push(keyword.clone());
        }
    }
    result
}

/// Grouped keywords for a resume, optionally steered by a job description.
pub fn keyword_set(parsed: &ParsedResume, job_desc: &str, top_n: usize) -> KeywordSet {
    split_keywords_by_type(&best_keywords_for_scoring(parsed, job_desc, top_n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> ParsedResume {
        ParsedResume {
            name: "Jane Doe".to_string(),
            email: vec!["jane@x.com".to_string()],
            phone: vec![],
            skills: vec!["Python".to_string(), "SQL".to_string()],
            education: vec!["BS CS".to_string()],
            experience: vec!["Built APIs".to_string()],
        }
    }

    #[test]
    fn test_clean_text_keeps_tech_punctuation() {
        assert_eq!(clean_text("Node.js, React & C++!"), "node.js react c++");
        assert_eq!(clean_text("  CI/CD   pipelines "), "ci/cd pipelines");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_tech_phrase_outranks_and_absorbs_unigrams() {
        let candidates = extract_candidate_keywords("Python SQL");
        assert_eq!(candidates, vec!["python sql".to_string()]);
    }

    #[test]
    fn test_stop_word_edges_dropped() {
        let candidates =
            extract_candidate_keywords("Looking for a Python developer with SQL experience");
        assert_eq!(
            candidates,
            vec![
                "developer with sql".to_string(),
                "python developer".to_string(),
                "sql experience".to_string(),
                "looking".to_string(),
            ]
        );
    }

    #[test]
    fn test_numeric_and_single_char_grams_skipped() {
        assert!(extract_candidate_keywords("2019").is_empty());
        assert!(extract_candidate_keywords("x").is_empty());
        assert!(extract_candidate_keywords("the").is_empty());
    }

    #[test]
    fn test_frequency_raises_rank() {
        let candidates = extract_candidate_keywords("mentoring budgeting mentoring hiring mentoring");
        assert_eq!(candidates.first().map(String::as_str), Some("mentoring"));
    }

    #[test]
    fn test_candidates_capped() {
        let text: String = (0..200).map(|i| format!("word{i}. ")).collect();
        assert!(extract_candidate_keywords(&text).len() <= MAX_CANDIDATES);
    }

    #[test]
    fn test_resume_keywords_start_with_skills() {
        let keywords = generate_keywords_from_resume(&jane(), 30);
        assert_eq!(&keywords[..2], &["python".to_string(), "sql".to_string()]);
        assert!(keywords.len() > 2, "experience/education mined too: {keywords:?}");
    }

    #[test]
    fn test_resume_keywords_respect_top_n() {
        assert_eq!(generate_keywords_from_resume(&jane(), 1), vec!["python".to_string()]);
    }

    #[test]
    fn test_best_keywords_put_overlap_first() {
        let keywords = best_keywords_for_scoring(
            &jane(),
            "Looking for a Python developer with SQL experience",
            40,
        );
        assert_eq!(&keywords[..2], &["python".to_string(), "sql".to_string()]);
        assert!(keywords.contains(&"python developer".to_string()));
    }

    #[test]
    fn test_best_keywords_dedupe_case_insensitive() {
        let parsed = ParsedResume {
            skills: vec!["Rust".to_string()],
            ..Default::default()
        };
        let keywords = best_keywords_for_scoring(&parsed, "RUST", 10);
        assert_eq!(keywords, vec!["rust".to_string()]);
    }

    #[test]
    fn test_best_keywords_without_jd_are_resume_keywords() {
        assert_eq!(
            best_keywords_for_scoring(&jane(), "", 40),
            generate_keywords_from_resume(&jane(), 40)
        );
    }

    #[test]
    fn test_empty_resume_and_jd_yield_nothing() {
        assert!(best_keywords_for_scoring(&ParsedResume::default(), "", 40).is_empty());
    }

    #[test]
    fn test_split_keywords_by_type() {
        let keywords: Vec<String> = ["python", "team leadership", "supply chain", "erp", "logistics"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let set = split_keywords_by_type(&keywords);
        assert_eq!(set.technical_keywords, vec!["python".to_string(), "erp".to_string()]);
        assert_eq!(set.soft_keywords, vec!["team leadership".to_string()]);
        assert_eq!(
            set.domain_keywords,
            vec!["supply chain".to_string(), "logistics".to_string()]
        );
        assert_eq!(set.top_keywords_flat.len(), 5);
    }
}
