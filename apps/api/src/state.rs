use std::sync::Arc;

use crate::config::Config;
use crate::scoring::ScoringEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built once at startup with the similarity backend selected for this process.
    pub engine: Arc<ScoringEngine>,
}
