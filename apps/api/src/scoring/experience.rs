use serde::{Deserialize, Serialize};

use super::{mean, reference_text, scale, ComponentResult};
use crate::models::resume::ParsedResume;
use crate::similarity::{ModeSummary, ModeTally, SimilarityBackend};

/// Resume keywords used as the reference when there is no job description.
pub const REFERENCE_KEYWORDS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoExperience,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExperienceDiagnostics {
    Skipped {
        reason: SkipReason,
    },
    Scored {
        avg_similarity: f64,
        lines_scored: usize,
        scaled: f64,
        similarity_mode: ModeSummary,
    },
}

/// Mean similarity of each experience line to the reference text, scaled by `weight`.
pub fn score(
    parsed: &ParsedResume,
    job_desc: &str,
    weight: f64,
    similarity: &dyn SimilarityBackend,
) -> ComponentResult<ExperienceDiagnostics> {
    if parsed.experience.is_empty() {
        return ComponentResult {
            scaled_score: 0.0,
            diagnostics: ExperienceDiagnostics::Skipped {
                reason: SkipReason::NoExperience,
            },
        };
    }

    let reference = reference_text(parsed, job_desc, REFERENCE_KEYWORDS);
    let mut tally = ModeTally::default();
    let sims: Vec<f64> = parsed
        .experience
        .iter()
        .map(|line| tally.record(similarity.similarity(line, &reference)))
        .collect();

    let avg_similarity = mean(&sims);
    let scaled = scale(avg_similarity, weight);

    ComponentResult {
        scaled_score: scaled,
        diagnostics: ExperienceDiagnostics::Scored {
            avg_similarity,
            lines_scored: sims.len(),
            scaled,
            similarity_mode: tally.summary(),
        },
    }
}
