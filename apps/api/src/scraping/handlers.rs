//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::handlers::require_summary;
use crate::analysis::keywords::{derive_keywords, KeywordSet};
use crate::errors::AppError;
use crate::scraping::listing::JobListing;
use crate::scraping::orchestrator::{PlatformSearchResults, SearchOutcome};
use crate::scraping::platform::{Platform, SearchQuery, DEFAULT_ROWS, MAX_ROWS};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub keywords: String,
    pub location: Option<String>,
    pub rows: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    pub summary: String,
    pub location: Option<String>,
    pub rows: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ListingsQuery {
    pub keywords: String,
    pub rows: Option<u32>,
}

/// One platform's results as the presentation layer renders them.
#[derive(Debug, Serialize)]
pub struct PlatformResults {
    pub platform: Platform,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub listings: Vec<JobListing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PlatformResults {
    fn new(platform: Platform, outcome: SearchOutcome) -> Self {
        let kind = outcome.kind();
        let detail = outcome.detail();
        let listings = outcome.into_listings();
        let message = listings
            .is_empty()
            .then(|| format!("No {} jobs found.", platform.display_name()));
        Self {
            platform,
            outcome: kind,
            detail,
            listings,
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: SearchQuery,
    pub linkedin: PlatformResults,
    pub naukri: PlatformResults,
}

impl SearchResponse {
    fn new(query: SearchQuery, results: PlatformSearchResults) -> Self {
        Self {
            query,
            linkedin: PlatformResults::new(Platform::LinkedIn, results.linkedin),
            naukri: PlatformResults::new(Platform::Naukri, results.naukri),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub keywords: KeywordSet,
    #[serde(flatten)]
    pub results: SearchResponse,
}

#[derive(Debug, Serialize)]
pub struct ScraperHealth {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/search
pub async fn handle_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = build_query(&state, &req.keywords, req.location, req.rows)?;
    let results = state.orchestrator.search_all(&query).await;
    Ok(Json(SearchResponse::new(query, results)))
}

/// POST /api/v1/jobs/recommendations
///
/// Derives keywords from the analysis summary, then searches both platforms.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Json(req): Json<RecommendationsRequest>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let summary = require_summary(&req.summary)?;
    let keywords = derive_keywords(
        state.analyzer.as_ref(),
        summary,
        &state.config.fallback_keywords,
    )
    .await?;

    let query = build_query(&state, &keywords.query(), req.location, req.rows)?;
    let results = state.orchestrator.search_all(&query).await;
    info!(
        "Recommendations for '{}': linkedin={}, naukri={}",
        query.keywords,
        results.linkedin.kind(),
        results.naukri.kind()
    );

    Ok(Json(RecommendationsResponse {
        keywords,
        results: SearchResponse::new(query, results),
    }))
}

/// GET /api/v1/jobs/linkedin?keywords=..&rows=..
pub async fn handle_linkedin_listings(
    State(state): State<AppState>,
    Query(params): Query<ListingsQuery>,
) -> Result<Json<Vec<JobListing>>, AppError> {
    let rows = validate_rows(params.rows)?;
    let keywords = require_keywords(&params.keywords)?;
    Ok(Json(
        state.orchestrator.fetch_linkedin_jobs(keywords, rows).await,
    ))
}

/// GET /api/v1/jobs/naukri?keywords=..&rows=..
pub async fn handle_naukri_listings(
    State(state): State<AppState>,
    Query(params): Query<ListingsQuery>,
) -> Result<Json<Vec<JobListing>>, AppError> {
    let rows = validate_rows(params.rows)?;
    let keywords = require_keywords(&params.keywords)?;
    Ok(Json(state.orchestrator.fetch_naukri_jobs(keywords, rows).await))
}

/// GET /api/v1/scraper/health
pub async fn handle_scraper_health(
    State(state): State<AppState>,
) -> (StatusCode, Json<ScraperHealth>) {
    match state.orchestrator.check_connection().await {
        Ok(username) => {
            info!("Scraping service reachable as {username}");
            (
                StatusCode::OK,
                Json(ScraperHealth {
                    connected: true,
                    username: Some(username),
                    error: None,
                }),
            )
        }
        Err(e) => {
            warn!("Scraping service connection test failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ScraperHealth {
                    connected: false,
                    username: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn build_query(
    state: &AppState,
    keywords: &str,
    location: Option<String>,
    rows: Option<u32>,
) -> Result<SearchQuery, AppError> {
    let keywords = require_keywords(keywords)?;
    let rows = validate_rows(rows)?;
    let location = location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| state.orchestrator.default_location().to_string());
    Ok(SearchQuery::new(keywords, location, rows))
}

fn require_keywords(keywords: &str) -> Result<&str, AppError> {
    let keywords = keywords.trim();
    if keywords.is_empty() {
        return Err(AppError::Validation("keywords must not be empty".to_string()));
    }
    Ok(keywords)
}

/// Defaults to `DEFAULT_ROWS`; zero is rejected, large values are capped.
fn validate_rows(rows: Option<u32>) -> Result<u32, AppError> {
    match rows {
        None => Ok(DEFAULT_ROWS),
        Some(0) => Err(AppError::Validation("rows must be positive".to_string())),
        Some(n) => Ok(n.min(MAX_ROWS)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rows() {
        assert_eq!(validate_rows(None).unwrap(), DEFAULT_ROWS);
        assert_eq!(validate_rows(Some(7)).unwrap(), 7);
        assert_eq!(validate_rows(Some(10_000)).unwrap(), MAX_ROWS);
        assert!(matches!(validate_rows(Some(0)), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_require_keywords_trims() {
        assert_eq!(require_keywords("  Data Analyst ").unwrap(), "Data Analyst");
        assert!(require_keywords(" \n ").is_err());
    }

    #[test]
    fn test_platform_results_message_only_when_empty() {
        let empty = PlatformResults::new(Platform::Naukri, SearchOutcome::Empty);
        assert_eq!(empty.message.as_deref(), Some("No Naukri jobs found."));
        assert_eq!(empty.outcome, "empty");

        let failed = PlatformResults::new(
            Platform::LinkedIn,
            SearchOutcome::ServiceError("HTTP error".into()),
        );
        assert_eq!(failed.outcome, "service_error");
        assert_eq!(failed.detail.as_deref(), Some("HTTP error"));
        assert!(failed.listings.is_empty());
    }
}
