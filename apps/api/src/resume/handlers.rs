use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::models::resume::{Analysis, ParsedResume};
use crate::resume::keywords::{keyword_set, KeywordSet};
use crate::resume::parser::parse_resume;
use crate::scoring::skill_match::AUTO_KEYWORDS;
use crate::scoring::ScoringReport;
use crate::state::AppState;

const MAX_TOP_N: usize = 200;

#[derive(Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct KeywordsRequest {
    pub parsed: ParsedResume,
    #[serde(default)]
    pub job_desc: String,
    pub top_n: Option<usize>,
}

#[derive(Deserialize)]
pub struct ScoreRequest {
    pub parsed: ParsedResume,
    #[serde(default)]
    pub job_desc: String,
    /// Overrides the keywords derived from the resume and job description.
    pub target_keywords: Option<Vec<String>>,
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse(Json(req): Json<ParseRequest>) -> Result<Json<ParsedResume>, AppError> {
    Ok(Json(parse_resume(&req.text)?))
}

/// POST /api/v1/resumes/keywords
pub async fn handle_keywords(Json(req): Json<KeywordsRequest>) -> Result<Json<KeywordSet>, AppError> {
    let top_n = req.top_n.unwrap_or(AUTO_KEYWORDS);
    if top_n == 0 || top_n > MAX_TOP_N {
        return Err(AppError::Validation(format!(
            "top_n must be between 1 and {MAX_TOP_N}, got {top_n}"
        )));
    }
    Ok(Json(keyword_set(&req.parsed, &req.job_desc, top_n)))
}

/// POST /api/v1/resumes/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoringReport>, AppError> {
    let engine = state.engine.clone();
    let report = tokio::task::spawn_blocking(move || {
        engine.score(&req.parsed, &req.job_desc, req.target_keywords.as_deref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in scoring: {e}")))?;

    Ok(Json(report))
}

/// POST /api/v1/resumes/analyze
///
/// Multipart fields: `file` (required, .pdf/.docx/.txt), `job_desc` (optional text),
/// `keywords` (optional, comma-separated; stands in for the job description when none
/// is given).
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Analysis>, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut job_desc = String::new();
    let mut keywords = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("file field needs a filename".to_string()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;
                file = Some((file_name, bytes));
            }
            "job_desc" | "keywords" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("could not read {name}: {e}")))?;
                if name == "job_desc" {
                    job_desc = text;
                } else {
                    keywords = text;
                }
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("missing multipart field `file`".to_string()))?;
    let job_desc = effective_job_desc(&job_desc, &keywords);

    info!("Analyzing {file_name} ({} bytes)", bytes.len());

    let engine = state.engine.clone();
    let analysis = tokio::task::spawn_blocking(move || -> Result<Analysis, AppError> {
        let extracted = extract_text(&file_name, &bytes)?;
        Ok(engine.analyze(&extracted.text, &job_desc, None)?)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in analysis: {e}")))??;

    Ok(Json(analysis))
}

/// The job description text, or the comma-separated keywords joined with spaces when
/// no job description was given.
fn effective_job_desc(job_desc: &str, keywords: &str) -> String {
    let job_desc = job_desc.trim();
    if !job_desc.is_empty() {
        return job_desc.to_string();
    }
    keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
