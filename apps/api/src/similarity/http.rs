//! HTTP embedder for OpenAI-compatible `/embeddings` endpoints (OpenAI, Ollama,
//! llama.cpp server, text-embeddings-inference).
//!
//! Blocking client: scoring is synchronous and runs on blocking threads, so the
//! embedder must never be called from inside an async task.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::embedding::{Embedder, EmbeddingError};
use crate::config::EmbeddingConfig;

const PROBE_TEXT: &str = "resume analyzer connectivity probe";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

pub struct HttpEmbedder {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
    id: String,
}

impl HttpEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            id: format!("http:{}", config.model),
        })
    }

    /// Builds the embedder and embeds one probe text to prove the endpoint works.
    pub fn connect(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let embedder = Self::new(config)?;
        let probe = embedder.embed(PROBE_TEXT)?;
        info!(
            "Embedding endpoint {} ready (model: {}, dim: {})",
            embedder.url,
            embedder.model,
            probe.len()
        );
        Ok(embedder)
    }
}

impl Embedder for HttpEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: [text],
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send()?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let parsed: EmbeddingResponse = response.json()?;
        let vector = first_vector(parsed)?;
        debug!("Embedded {} chars into {} dims", text.len(), vector.len());
        Ok(vector)
    }
}

/// Pulls `error.message` out of an OpenAI-style error body, else returns the body as-is.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

fn first_vector(response: EmbeddingResponse) -> Result<Vec<f32>, EmbeddingError> {
    response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .filter(|v| !v.is_empty())
        .ok_or(EmbeddingError::EmptyResponse)
}
