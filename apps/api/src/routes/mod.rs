pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::scraping::handlers as jobs;
use crate::state::AppState;

/// Résumé PDFs rarely exceed a few hundred KB; leave room for scanned ones.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/scraper/health",
            get(jobs::handle_scraper_health),
        )
        // Analysis API
        .route("/api/v1/resume/analyze", post(analysis::handle_analyze))
        .route("/api/v1/jobs/keywords", post(analysis::handle_keywords))
        // Jobs API
        .route("/api/v1/jobs/search", post(jobs::handle_search))
        .route(
            "/api/v1/jobs/recommendations",
            post(jobs::handle_recommendations),
        )
        .route("/api/v1/jobs/linkedin", get(jobs::handle_linkedin_listings))
        .route("/api/v1/jobs/naukri", get(jobs::handle_naukri_listings))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
