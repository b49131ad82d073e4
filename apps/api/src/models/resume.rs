use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::ScoringReport;

/// Structured resume fields produced by the parser.
///
/// Absence is always emptiness: every field defaults to an empty string or list,
/// so a JSON payload may omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResume {
    pub name: String,
    /// Distinct addresses; order carries no meaning.
    pub email: Vec<String>,
    /// Distinct numbers; order carries no meaning.
    pub phone: Vec<String>,
    /// Deduplicated, in first-seen order.
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
}

impl ParsedResume {
    /// Skills joined with single spaces; the blob skill matching runs against.
    pub fn skills_text(&self) -> String {
        self.skills.join(" ")
    }
}

/// Full analysis handed back to API callers: the parsed fields, the score report,
/// and whether a job description took part in scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub parsed: ParsedResume,
    pub scores: ScoringReport,
    pub job_desc_used: bool,
    pub job_desc_text: Option<String>,
}
