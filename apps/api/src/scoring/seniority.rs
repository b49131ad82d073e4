//! Seniority depth — a volume/breadth heuristic, not a tenure calculation.
//!
//! Looks only at the resume (never the job description): how many experience lines and
//! how many distinct skills it lists. Four lines and fifteen skills saturate the score.

use serde::{Deserialize, Serialize};

use super::{scale, ComponentResult};
use crate::models::resume::ParsedResume;

const EXPERIENCE_SATURATION: f64 = 4.0;
const SKILL_SATURATION: f64 = 15.0;
const DEPTH_WEIGHT: f64 = 0.6;
const BREADTH_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeniorityDiagnostics {
    pub num_experience: usize,
    pub num_skills: usize,
    pub experience_depth: f64,
    pub skill_breadth: f64,
    pub raw: f64,
    pub scaled: f64,
}

pub fn score(parsed: &ParsedResume, weight: f64) -> ComponentResult<SeniorityDiagnostics> {
    let num_experience = parsed.experience.len();
    let num_skills = parsed.skills.len();

    let experience_depth = (num_experience as f64 / EXPERIENCE_SATURATION).min(1.0);
    let skill_breadth = (num_skills as f64 / SKILL_SATURATION).min(1.0);
    let raw = DEPTH_WEIGHT * experience_depth + BREADTH_WEIGHT * skill_breadth;
    let scaled = scale(raw, weight);

    ComponentResult {
        scaled_score: scaled,
        diagnostics: SeniorityDiagnostics {
            num_experience,
            num_skills,
            experience_depth,
            skill_breadth,
            raw,
            scaled,
        },
    }
}
