use std::str::FromStr;

use anyhow::{Context, Result};

use crate::scoring::{Component, ScoreWeights};

const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";
const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 30;
const DEFAULT_EMBEDDING_CACHE_SIZE: usize = 2048;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// `None` keeps the process in Jaccard-only similarity mode.
    pub embedding: Option<EmbeddingConfig>,
    pub weights: ScoreWeights,
    pub max_upload_bytes: usize,
}

/// Connection settings for an OpenAI-compatible `/embeddings` endpoint.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub cache_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let embedding = match optional_env("EMBEDDING_URL") {
            Some(url) => Some(EmbeddingConfig {
                url,
                model: optional_env("EMBEDDING_MODEL")
                    .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
                api_key: optional_env("EMBEDDING_API_KEY"),
                timeout_secs: parse_env("EMBEDDING_TIMEOUT_SECS", DEFAULT_EMBEDDING_TIMEOUT_SECS)?,
                cache_size: parse_env("EMBEDDING_CACHE_SIZE", DEFAULT_EMBEDDING_CACHE_SIZE)?,
            }),
            None => None,
        };

        let defaults = ScoreWeights::default();
        let weights = ScoreWeights::new(
            parse_env("SCORE_WEIGHT_COMPLETENESS", defaults.get(Component::Completeness))?,
            parse_env("SCORE_WEIGHT_SKILL_MATCH", defaults.get(Component::SkillMatch))?,
            parse_env("SCORE_WEIGHT_EXPERIENCE_RELEVANCE", defaults.get(Component::ExperienceRelevance))?,
            parse_env("SCORE_WEIGHT_PROJECTS_CERT", defaults.get(Component::ProjectsCert))?,
            parse_env("SCORE_WEIGHT_SENIORITY", defaults.get(Component::Seniority))?,
        )
        .context("SCORE_WEIGHT_* variables do not form a valid weight table")?;

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            embedding,
            weights,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

/// Returns the variable's value, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u16 = parse_env("RESUME_ANALYZER_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("RESUME_ANALYZER_TEST_BAD_NUMBER", "eight");
        let result: Result<u16> = parse_env("RESUME_ANALYZER_TEST_BAD_NUMBER", 1);
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("RESUME_ANALYZER_TEST_BAD_NUMBER"), "{message}");
    }

    #[test]
    fn test_optional_env_treats_blank_as_unset() {
        std::env::set_var("RESUME_ANALYZER_TEST_BLANK", "   ");
        assert!(optional_env("RESUME_ANALYZER_TEST_BLANK").is_none());
    }

    #[test]
    fn test_parse_env_reads_float_weight() {
        std::env::set_var("RESUME_ANALYZER_TEST_WEIGHT", "12.5");
        let value: f64 = parse_env("RESUME_ANALYZER_TEST_WEIGHT", 0.0).unwrap();
        assert!((value - 12.5).abs() < f64::EPSILON);
    }
}
