use serde::{Deserialize, Serialize};

use super::{reference_text, scale, ComponentResult};
use crate::models::resume::ParsedResume;
use crate::similarity::{ModeSummary, ModeTally, SimilarityBackend};

pub const REFERENCE_KEYWORDS: usize = 20;

/// Certification and cloud-platform markers, matched as case-insensitive substrings.
const CERT_TOKENS: [&str; 6] = ["certificate", "certification", "certified", "aws", "gcp", "azure"];

const SIMILARITY_WEIGHT: f64 = 0.6;
const PRESENCE_WEIGHT: f64 = 0.4;
/// Two markers earn the full presence score.
const PRESENCE_SATURATION: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectsDiagnostics {
    pub found_certs: Vec<String>,
    pub similarity: f64,
    pub presence_score: f64,
    pub raw: f64,
    pub scaled: f64,
    pub similarity_mode: ModeSummary,
}

/// Certification markers plus similarity of experience and education to the reference.
pub fn score(
    parsed: &ParsedResume,
    job_desc: &str,
    weight: f64,
    similarity: &dyn SimilarityBackend,
) -> ComponentResult<ProjectsDiagnostics> {
    let blob = parsed
        .experience
        .iter()
        .chain(parsed.education.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    let blob_lower = blob.to_lowercase();

    let found_certs: Vec<String> = CERT_TOKENS
        .iter()
        .filter(|t| blob_lower.contains(*t))
        .map(|t| t.to_string())
        .collect();
    let presence_score = (found_certs.len() as f64 / PRESENCE_SATURATION).min(1.0);

    let reference = reference_text(parsed, job_desc, REFERENCE_KEYWORDS);
    let mut tally = ModeTally::default();
    let sim = tally.record(similarity.similarity(&blob, &reference));

    let raw = SIMILARITY_WEIGHT * sim + PRESENCE_WEIGHT * presence_score;
    let scaled = scale(raw, weight);

    ComponentResult {
        scaled_score: scaled,
        diagnostics: ProjectsDiagnostics {
            found_certs,
            similarity: sim,
            presence_score,
            raw,
            scaled,
            similarity_mode: tally.summary(),
        },
    }
}
