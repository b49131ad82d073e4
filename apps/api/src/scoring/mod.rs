//! Scoring engine — five independent component scorers and the orchestrator that
//! aggregates them into a bounded 0–100 score with a per-component diagnostic record.
//!
//! Every scorer takes the similarity backend by reference and never fails: missing
//! resume fields score 0 with an explanatory diagnostic, and similarity errors are
//! absorbed by the backend itself.

pub mod completeness;
pub mod engine;
pub mod experience;
pub mod projects;
pub mod seniority;
pub mod skill_match;
pub mod weights;

use serde::{Deserialize, Serialize};

use crate::models::resume::ParsedResume;
use crate::resume::keywords::generate_keywords_from_resume;
use crate::similarity::clamp_unit;

pub use engine::{ScoringEngine, ScoringError, ScoringReport};
pub use weights::{Component, ScoreWeights};

/// A component's contribution: `scaled_score` in `[0, weight]` plus its diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentResult<D> {
    pub scaled_score: f64,
    pub diagnostics: D,
}

/// Clamps a raw fraction to [0, 1] and scales it by the component weight.
pub(crate) fn scale(raw: f64, weight: f64) -> f64 {
    clamp_unit(raw) * weight
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The text similarity is measured against: the job description when one is given,
/// otherwise the resume's own top keywords.
pub(crate) fn reference_text(parsed: &ParsedResume, job_desc: &str, top_n: usize) -> String {
    if job_desc.trim().is_empty() {
        generate_keywords_from_resume(parsed, top_n).join(" ")
    } else {
        job_desc.to_string()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::resume::ParsedResume;

    pub fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    pub fn jane() -> ParsedResume {
        ParsedResume {
            name: "Jane Doe".to_string(),
            email: strings(&["jane@x.com"]),
            phone: vec![],
            skills: strings(&["Python", "SQL"]),
            education: strings(&["BS CS"]),
            experience: strings(&["Built APIs"]),
        }
    }

    pub fn senior() -> ParsedResume {
        ParsedResume {
            name: "Alex Kim".to_string(),
            email: strings(&["alex@kim.dev"]),
            phone: strings(&["555-123-4567"]),
            skills: strings(&[
                "Rust", "Go", "Python", "SQL", "PostgreSQL", "Redis", "Docker", "Kubernetes",
                "AWS", "Terraform", "gRPC", "Kafka", "Linux", "Git", "CI/CD", "GraphQL",
            ]),
            education: strings(&["MS Computer Science", "AWS Certified Solutions Architect"]),
            experience: strings(&[
                "Designed a distributed Rust storage engine",
                "Led migration of Python services to Kubernetes on AWS",
                "Built Kafka streaming pipelines processing 2B events per day",
                "Mentored six backend engineers",
                "Owned PostgreSQL performance tuning",
            ]),
        }
    }

    pub const JD: &str = "Looking for a Python developer with SQL experience";
}
