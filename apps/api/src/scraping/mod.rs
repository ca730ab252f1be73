// Job retrieval: remote scraping service client, per-platform vocabularies,
// the polling orchestrator, listing normalization and the HTTP handlers over them.

pub mod client;
pub mod handlers;
pub mod listing;
pub mod orchestrator;
pub mod platform;

#[cfg(test)]
pub mod fake;

pub use client::ApifyClient;
pub use orchestrator::{JobOrchestrator, PollPolicy};
