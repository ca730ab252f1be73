//! Résumé analysis: summary, skill gaps and career roadmap from extracted text,
//! plus the search keywords derived from the summary.
//!
//! Nothing here is persisted; results live for the request that produced them.

pub mod handlers;
pub mod keywords;
pub mod prompts;

use serde::Serialize;
use tracing::info;

use crate::analysis::prompts::{
    GAPS_MAX_TOKENS, GAPS_PROMPT, ROADMAP_MAX_TOKENS, ROADMAP_PROMPT, SUMMARY_MAX_TOKENS,
    SUMMARY_PROMPT,
};
use crate::errors::AppError;
use crate::llm_client::NarrativeAnalyzer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub gaps: String,
    pub roadmap: String,
}

/// Runs the three analysis prompts. They are independent, so they run
/// concurrently; any failure fails the whole analysis.
pub async fn analyze_resume(
    analyzer: &dyn NarrativeAnalyzer,
    resume_text: &str,
) -> Result<AnalysisResult, AppError> {
    let ask = |template: &str, max_tokens: u32, purpose: &'static str| {
        let prompt = template.replace("{resume_text}", resume_text);
        async move {
            info!("Requesting résumé {purpose}");
            analyzer
                .complete(&prompt, max_tokens)
                .await
                .map_err(|e| AppError::Llm(format!("Failed to generate {purpose}: {e}")))
        }
    };

    let (summary, gaps, roadmap) = tokio::try_join!(
        ask(SUMMARY_PROMPT, SUMMARY_MAX_TOKENS, "summary"),
        ask(GAPS_PROMPT, GAPS_MAX_TOKENS, "skill gaps"),
        ask(ROADMAP_PROMPT, ROADMAP_MAX_TOKENS, "roadmap"),
    )?;

    Ok(AnalysisResult {
        summary,
        gaps,
        roadmap,
    })
}
