//! Search keyword derivation from the résumé summary.
//!
//! The model is asked for a bare comma-separated list but does not always comply,
//! so its answer is parsed and filtered; when nothing usable survives the caller's
//! fallback terms are used instead.

use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::prompts::{KEYWORDS_MAX_TOKENS, KEYWORDS_PROMPT};
use crate::errors::AppError;
use crate::llm_client::NarrativeAnalyzer;

const MAX_TERM_CHARS: usize = 80;
const MAX_TERM_WORDS: usize = 8;
const MAX_LABEL_WORDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordSet {
    pub keywords: Vec<String>,
    pub from_fallback: bool,
}

impl KeywordSet {
    /// The single search string sent to the job platforms.
    pub fn query(&self) -> String {
        self.keywords.join(", ")
    }
}

pub async fn derive_keywords(
    analyzer: &dyn NarrativeAnalyzer,
    summary: &str,
    fallback: &str,
) -> Result<KeywordSet, AppError> {
    let prompt = KEYWORDS_PROMPT.replace("{summary}", summary);
    let raw = analyzer
        .complete(&prompt, KEYWORDS_MAX_TOKENS)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to derive search keywords: {e}")))?;

    let keywords = parse_keywords(&raw);
    if !keywords.is_empty() {
        info!("Extracted job keywords: {}", keywords.join(", "));
        return Ok(KeywordSet {
            keywords,
            from_fallback: false,
        });
    }

    warn!("Keyword response had no usable terms, using fallback '{fallback}'");
    let keywords = parse_keywords(fallback);
    if keywords.is_empty() {
        return Err(AppError::Validation(
            "No usable search keywords could be derived".to_string(),
        ));
    }
    Ok(KeywordSet {
        keywords,
        from_fallback: true,
    })
}

/// Splits a model answer into clean search terms: comma separated, trimmed,
/// stripped of list markers and quotes, prose-length entries dropped,
/// case-insensitive duplicates removed.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    let flattened = raw.replace('\r', "").replace('\n', ",");
    let mut seen = std::collections::HashSet::new();

    flattened
        .split(',')
        .map(clean_term)
        .filter(|term| is_usable(term))
        .filter(|term| seen.insert(term.to_lowercase()))
        .collect()
}

fn clean_term(term: &str) -> String {
    let term = strip_label(strip_list_marker(term.trim()))
        .trim_end_matches('.')
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim_end_matches('.')
        .trim();
    term.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drops a leading bullet (`-`, `*`, `•`) or ordinal (`1.`, `2)`).
fn strip_list_marker(term: &str) -> &str {
    let term = term
        .trim_start_matches(|c: char| c == '-' || c == '*' || c == '•')
        .trim_start();
    let digits = term.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = term[digits..].strip_prefix(|c: char| c == '.' || c == ')') {
            return rest.trim_start();
        }
    }
    term
}

/// Drops a short leading label such as `Keywords:` or `Job titles:` when a term follows it.
fn strip_label(term: &str) -> &str {
    match term.split_once(':') {
        Some((label, rest))
            if !rest.trim().is_empty()
                && label.split_whitespace().count() <= MAX_LABEL_WORDS
                && label.chars().any(char::is_alphabetic)
                && label.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) =>
        {
            rest.trim_start()
        }
        _ => term,
    }
}

fn is_usable(term: &str) -> bool {
    !term.is_empty()
        && term.chars().count() <= MAX_TERM_CHARS
        && term.split_whitespace().count() <= MAX_TERM_WORDS
        && !term.ends_with(':')
}
