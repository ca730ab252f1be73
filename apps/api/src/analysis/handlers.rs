//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::keywords::{derive_keywords, KeywordSet};
use crate::analysis::{analyze_resume, AnalysisResult};
use crate::document::extract_text;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub resume_text: String,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    #[serde(flatten)]
    pub keywords: KeywordSet,
    pub query: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/analyze
///
/// Multipart upload with the résumé PDF in a `file` field.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let pdf = read_upload(multipart).await?;
    let analysis_id = Uuid::new_v4();
    info!("Analysis {analysis_id}: received {} byte résumé", pdf.len());

    let resume_text = extract_text(pdf).await?;
    let analysis = analyze_resume(state.analyzer.as_ref(), &resume_text).await?;
    info!("Analysis {analysis_id} completed");

    Ok(Json(AnalyzeResponse {
        analysis_id,
        resume_text,
        analysis,
    }))
}

/// POST /api/v1/jobs/keywords
pub async fn handle_keywords(
    State(state): State<AppState>,
    Json(req): Json<KeywordsRequest>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let summary = require_summary(&req.summary)?;
    let keywords = derive_keywords(
        state.analyzer.as_ref(),
        summary,
        &state.config.fallback_keywords,
    )
    .await?;
    Ok(Json(KeywordsResponse {
        query: keywords.query(),
        keywords,
    }))
}

pub(crate) fn require_summary(summary: &str) -> Result<&str, AppError> {
    let summary = summary.trim();
    if summary.is_empty() {
        return Err(AppError::Validation("summary must not be empty".to_string()));
    }
    Ok(summary)
}

/// Takes the `file` field, or the only field when the client named it differently.
async fn read_upload(mut multipart: Multipart) -> Result<Bytes, AppError> {
    let mut fallback: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let is_file = field.name() == Some("file");
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        if is_file {
            return non_empty(data);
        }
        fallback.get_or_insert(data);
    }

    match fallback {
        Some(data) => non_empty(data),
        None => Err(AppError::Validation(
            "Expected a PDF in the 'file' field".to_string(),
        )),
    }
}

fn non_empty(data: Bytes) -> Result<Bytes, AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    Ok(data)
}
