//! Document extraction: uploaded PDF bytes to plain text via `pdf-extract`.
//!
//! Parsing is CPU-bound, so it runs inside `tokio::task::spawn_blocking`.

use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Extracts the text layer of a PDF held in memory.
pub async fn extract_text(pdf: Bytes) -> Result<String, AppError> {
    if !looks_like_pdf(&pdf) {
        return Err(AppError::Extraction(
            "file does not start with a PDF header".to_string(),
        ));
    }

    let size = pdf.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await
        .map_err(|e| {
            // pdf-extract panics on some malformed inputs
            if e.is_panic() {
                AppError::Extraction("PDF parser rejected the document".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}"))
            }
        })?
        .map_err(|e| AppError::Extraction(e.to_string()))?;

    let text = normalize_whitespace(&text);
    debug!("Extracted {} chars from {} byte PDF", text.len(), size);

    if text.is_empty() {
        return Err(AppError::Extraction(
            "PDF contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

fn looks_like_pdf(bytes: &[u8]) -> bool {
    // Some producers emit a BOM or blank lines before the header.
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

/// Trims each line and collapses runs of blank lines left by the layout pass.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}
