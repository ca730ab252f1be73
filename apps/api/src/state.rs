use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::NarrativeAnalyzer;
use crate::scraping::JobOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Hosted LLM used for analysis and keyword derivation.
    pub analyzer: Arc<dyn NarrativeAnalyzer>,
    /// Owns the single scraping client; cloned handles share it read-only.
    pub orchestrator: JobOrchestrator,
    pub config: Config,
}
