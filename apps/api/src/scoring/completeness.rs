use serde::{Deserialize, Serialize};

use super::{scale, ComponentResult};
use crate::models::resume::ParsedResume;

const FIELD_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessDiagnostics {
    pub present_fields: Vec<String>,
    pub missing_fields: Vec<String>,
    pub present_count: usize,
    pub scaled: f64,
}

/// Fraction of the six resume fields that carry content, scaled by `weight`.
/// A blank name counts as missing.
pub fn score(parsed: &ParsedResume, weight: f64) -> ComponentResult<CompletenessDiagnostics> {
    let fields: [(&str, bool); FIELD_COUNT] = [
        ("name", !parsed.name.trim().is_empty()),
        ("email", !parsed.email.is_empty()),
        ("phone", !parsed.phone.is_empty()),
        ("skills", !parsed.skills.is_empty()),
        ("education", !parsed.education.is_empty()),
        ("experience", !parsed.experience.is_empty()),
    ];

    let (present, missing): (Vec<_>, Vec<_>) = fields.iter().partition(|(_, ok)| *ok);
    let present_count = present.len();
    let scaled = scale(present_count as f64 / FIELD_COUNT as f64, weight);

    ComponentResult {
        scaled_score: scaled,
        diagnostics: CompletenessDiagnostics {
            present_fields: present.iter().map(|(f, _)| f.to_string()).collect(),
            missing_fields: missing.iter().map(|(f, _)| f.to_string()).collect(),
            present_count,
            scaled,
        },
    }
}
