//! Skill match — the most heavily weighted component.
//!
//! Blends three signals into one fraction:
//! - `exact_ratio`: share of target keywords found verbatim (case-insensitive substring)
//!   in the joined skills text,
//! - `embedding_similarity`: similarity of the joined skills text to the reference text,
//! - `per_skill_average`: mean similarity of each individual skill to the reference text.

use serde::{Deserialize, Serialize};

use super::{mean, scale, ComponentResult};
use crate::models::resume::ParsedResume;
use crate::resume::keywords::best_keywords_for_scoring;
use crate::similarity::{clamp_unit, ModeSummary, ModeTally, SimilarityBackend};

/// Keywords derived when the caller supplies none.
pub const AUTO_KEYWORDS: usize = 40;

const EXACT_WEIGHT: f64 = 0.5;
const EMBEDDING_WEIGHT: f64 = 0.35;
const PER_SKILL_WEIGHT: f64 = 0.15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatchDiagnostics {
    pub target_keywords_used: Vec<String>,
    pub exact_matches: Vec<String>,
    pub exact_ratio: f64,
    pub embedding_similarity: f64,
    pub per_skill_average: f64,
    pub raw_score: f64,
    pub scaled: f64,
    pub similarity_mode: ModeSummary,
}

pub fn score(
    parsed: &ParsedResume,
    job_desc: &str,
    target_keywords: Option<&[String]>,
    weight: f64,
    similarity: &dyn SimilarityBackend,
) -> ComponentResult<SkillMatchDiagnostics> {
    let keywords: Vec<String> = match target_keywords {
        // a blank keyword is a substring of anything
        Some(explicit) => explicit
            .iter()
            .filter(|k| !k.trim().is_empty())
            .cloned()
            .collect(),
        None => best_keywords_for_scoring(parsed, job_desc, AUTO_KEYWORDS),
    };

    let skills_text = parsed.skills_text();
    let reference = if job_desc.trim().is_empty() {
        keywords.join(" ")
    } else {
        job_desc.to_string()
    };

    let skills_lower = skills_text.to_lowercase();
    let exact_matches: Vec<String> = keywords
        .iter()
        .filter(|k| skills_lower.contains(&k.to_lowercase()))
        .cloned()
        .collect();
    let exact_ratio = if keywords.is_empty() {
        0.0
    } else {
        exact_matches.len() as f64 / keywords.len() as f64
    };

    let mut tally = ModeTally::default();
    let embedding_similarity = tally.record(similarity.similarity(&skills_text, &reference));
    let per_skill: Vec<f64> = parsed
        .skills
        .iter()
        .map(|skill| tally.record(similarity.similarity(skill, &reference)))
        .collect();
    let per_skill_average = mean(&per_skill);

    let raw_score = clamp_unit(
        EXACT_WEIGHT * exact_ratio
            + EMBEDDING_WEIGHT * embedding_similarity
            + PER_SKILL_WEIGHT * per_skill_average,
    );
    let scaled = scale(raw_score, weight);

    ComponentResult {
        scaled_score: scaled,
        diagnostics: SkillMatchDiagnostics {
            target_keywords_used: keywords,
            exact_matches,
            exact_ratio,
            embedding_similarity,
            per_skill_average,
            raw_score,
            scaled,
            similarity_mode: tally.summary(),
        },
    }
}
