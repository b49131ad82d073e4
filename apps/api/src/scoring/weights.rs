//! Component weight table: percentage points allotted to each scorer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for the sum of all weights; the final score lives in [0, MAX_TOTAL].
pub const MAX_TOTAL: f64 = 100.0;

/// Tolerance for float noise when checking the sum (e.g. 33.3 + 33.3 + 33.4).
const SUM_EPSILON: f64 = 1e-9;

/// The five scoring components, in the order the engine runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Completeness,
    SkillMatch,
    ExperienceRelevance,
    ProjectsCert,
    Seniority,
}

impl Component {
    pub const ALL: [Component; 5] = [
        Component::Completeness,
        Component::SkillMatch,
        Component::ExperienceRelevance,
        Component::ProjectsCert,
        Component::Seniority,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Completeness => "completeness",
            Component::SkillMatch => "skill_match",
            Component::ExperienceRelevance => "experience_relevance",
            Component::ProjectsCert => "projects_cert",
            Component::Seniority => "seniority",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("weight for {component} must be a finite number, got {value}")]
    NotFinite { component: &'static str, value: f64 },

    #[error("weight for {component} must be non-negative, got {value}")]
    Negative { component: &'static str, value: f64 },

    #[error("weights sum to {sum}, which exceeds {MAX_TOTAL}")]
    SumExceeded { sum: f64 },
}

/// Validated weight table. Construct through [`ScoreWeights::new`] or `Default`;
/// fields stay private so an unvalidated table cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreWeights {
    completeness: f64,
    skill_match: f64,
    experience_relevance: f64,
    projects_cert: f64,
    seniority: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            completeness: 15.0,
            skill_match: 35.0,
            experience_relevance: 25.0,
            projects_cert: 10.0,
            seniority: 15.0,
        }
    }
}

impl ScoreWeights {
    pub fn new(
        completeness: f64,
        skill_match: f64,
        experience_relevance: f64,
        projects_cert: f64,
        seniority: f64,
    ) -> Result<Self, WeightsError> {
        let weights = Self {
            completeness,
            skill_match,
            experience_relevance,
            projects_cert,
            seniority,
        };

        for component in Component::ALL {
            let value = weights.get(component);
            if !value.is_finite() {
                return Err(WeightsError::NotFinite {
                    component: component.as_str(),
                    value,
                });
            }
            if value < 0.0 {
                return Err(WeightsError::Negative {
                    component: component.as_str(),
                    value,
                });
            }
        }

        let sum = weights.total();
        if sum > MAX_TOTAL + SUM_EPSILON {
            return Err(WeightsError::SumExceeded { sum });
        }

        Ok(weights)
    }

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
