//! Scoring orchestrator.
//!
//! `ScoringEngine` owns the validated weight table and the similarity backend chosen at
//! startup. It is built once, shared behind an `Arc`, and never mutated.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::completeness::CompletenessDiagnostics;
use super::experience::ExperienceDiagnostics;
use super::projects::ProjectsDiagnostics;
use super::seniority::SeniorityDiagnostics;
use super::skill_match::SkillMatchDiagnostics;
use super::weights::{Component, ScoreWeights, MAX_TOTAL};
use super::{completeness, experience, projects, round2, seniority, skill_match};
use crate::models::resume::{Analysis, ParsedResume};
use crate::resume::parser::{parse_resume, ParseError};
use crate::similarity::SimilarityBackend;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("cannot score resume: {0}")]
    InvalidResume(#[from] ParseError),
}

// ────────────────────────────────────────────────────────────────────────────
// Report
// ────────────────────────────────────────────────────────────────────────────

/// Scaled score per component, fields in the order the scorers run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub completeness: f64,
    pub skill_match: f64,
    pub experience_relevance: f64,
    pub projects_cert: f64,
    pub seniority: f64,
}

impl Breakdown {
    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::Completeness => self.completeness,
            Component::SkillMatch => self.skill_match,
            Component::ExperienceRelevance => self.experience_relevance,
            Component::ProjectsCert => self.projects_cert,
            Component::Seniority => self.seniority,
        }
    }

    pub fn total(&self) -> f64 {
        Component::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub completeness: CompletenessDiagnostics,
    pub skill_match: SkillMatchDiagnostics,
    pub experience_relevance: ExperienceDiagnostics,
    pub projects_cert: ProjectsDiagnostics,
    pub seniority: SeniorityDiagnostics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringReport {
    pub breakdown: Breakdown,
    pub diagnostics: Diagnostics,
    /// `clamp(breakdown.total(), 0, 100)` rounded to 2 decimals.
    pub final_score: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

pub struct ScoringEngine {
    weights: ScoreWeights,
    similarity: Arc<dyn SimilarityBackend>,
}

impl ScoringEngine {
    pub fn new(weights: ScoreWeights, similarity: Arc<dyn SimilarityBackend>) -> Self {
        Self {
            weights,
            similarity,
        }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Label of the similarity backend, e.g. `jaccard` or `embedding:http:all-minilm`.
    pub fn backend_label(&self) -> String {
        self.similarity.label()
    }

    /// Scores a parsed resume. `job_desc` may be empty; `target_keywords` overrides the
    /// automatically derived keyword list for skill matching.
    ///
    /// Synchronous and possibly slow (embedding calls); run it off the async runtime.
    pub fn score(
        &self,
        parsed: &ParsedResume,
        job_desc: &str,
        target_keywords: Option<&[String]>,
    ) -> ScoringReport {
        let similarity = self.similarity.as_ref();
        let w = &self.weights;

        let completeness = completeness::score(parsed, w.get(Component::Completeness));
        let skill_match = skill_match::score(
            parsed,
            job_desc,
            target_keywords,
            w.get(Component::SkillMatch),
            similarity,
        );
        let experience = experience::score(
            parsed,
            job_desc,
            w.get(Component::ExperienceRelevance),
            similarity,
        );
        let projects = projects::score(parsed, job_desc, w.get(Component::ProjectsCert), similarity);
        let seniority = seniority::score(parsed, w.get(Component::Seniority));

        let breakdown = Breakdown {
            completeness: completeness.scaled_score,
            skill_match: skill_match.scaled_score,
            experience_relevance: experience.scaled_score,
            projects_cert: projects.scaled_score,
            seniority: seniority.scaled_score,
        };
        let final_score = round2(breakdown.total().clamp(0.0, MAX_TOTAL));

        debug!(
            "Scored resume {:?}: final {final_score} (backend: {})",
            parsed.name,
            self.similarity.label()
        );

        ScoringReport {
            breakdown,
            diagnostics: Diagnostics {
                completeness: completeness.diagnostics,
                skill_match: skill_match.diagnostics,
                experience_relevance: experience.diagnostics,
                projects_cert: projects.diagnostics,
                seniority: seniority.diagnostics,
            },
            final_score,
        }
    }

    /// Parses raw resume text and scores it. Text the parser refuses is never scored.
    pub fn analyze(
        &self,
        text: &str,
        job_desc: &str,
        target_keywords: Option<&[String]>,
    ) -> Result<Analysis, ScoringError> {
        let parsed = parse_resume(text)?;
        let scores = self.score(&parsed, job_desc, target_keywords);
        let job_desc = job_desc.trim();

        Ok(Analysis {
            analysis_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            parsed,
            scores,
            job_desc_used: !job_desc.is_empty(),
            job_desc_text: (!job_desc.is_empty()).then(|| job_desc.to_string()),
        })
    }
}
