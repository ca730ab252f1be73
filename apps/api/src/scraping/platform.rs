//! Per-platform actor vocabularies.
//!
//! The two actors accept disjoint input schemas. Everything platform-specific
//! about building a run input lives here so the orchestrator stays uniform.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const WORLDWIDE: &str = "worldwide";
pub const DEFAULT_ROWS: u32 = 5;
pub const MAX_ROWS: u32 = 100;

const LINKEDIN_ACTOR_ID: &str = "BHzefUZlZRKWxkTck";
const NAUKRI_ACTOR_ID: &str = "alpcnRV9YI9lYVPWk";
/// The Naukri actor pages in fixed batches; asking for less returns nothing useful.
const NAUKRI_MIN_JOBS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LinkedIn,
    Naukri,
}

/// Which input schema to encode a query with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryVariant {
    Primary,
    Alternate,
}

/// Immutable search request shared by every platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub keywords: String,
    pub location: String,
    pub rows: u32,
}

impl SearchQuery {
    pub fn new(keywords: impl Into<String>, location: impl Into<String>, rows: u32) -> Self {
        Self {
            keywords: keywords.into(),
            location: location.into(),
            rows,
        }
    }

    pub fn with_location(&self, location: &str) -> Self {
        Self {
            location: location.to_string(),
            ..self.clone()
        }
    }

    pub fn is_worldwide(&self) -> bool {
        self.location.trim().eq_ignore_ascii_case(WORLDWIDE)
    }
}

impl Platform {
    pub fn actor_id(self) -> &'static str {
        match self {
            Platform::LinkedIn => LINKEDIN_ACTOR_ID,
            Platform::Naukri => NAUKRI_ACTOR_ID,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::Naukri => "Naukri",
        }
    }

    /// Keys holding the posting link, most specific first.
    pub(crate) fn url_keys(self) -> &'static [&'static str] {
        match self {
            Platform::LinkedIn => &["link", "jobUrl", "url"],
            Platform::Naukri => &["url", "jdURL", "link"],
        }
    }

    /// Encodes `query` in this platform's actor input schema.
    pub fn build_input(self, variant: QueryVariant, query: &SearchQuery) -> Value {
        match (self, variant) {
            (Platform::LinkedIn, QueryVariant::Primary) => json!({
                "title": query.keywords,
                "location": query.location,
                "rows": query.rows,
                "proxy": {
                    "useApifyProxy": true,
                    "apifyProxyGroups": ["RESIDENTIAL"],
                },
            }),
            (Platform::LinkedIn, QueryVariant::Alternate) => json!({
                "keywords": query.keywords,
                "location": query.location,
                "count": query.rows,
                "timeFilter": "anyTime",
                "sortBy": "mostRelevant",
            }),
            // Single vocabulary; the actor has no location filter.
            (Platform::Naukri, _) => json!({
                "keyword": query.keywords,
                "maxJobs": query.rows.max(NAUKRI_MIN_JOBS),
                "freshness": "all",
                "sortBy": "relevance",
                "experience": "all",
            }),
        }
    }

    /// Ordered attempts for a query. Each runs only if every earlier one came back empty.
    pub fn attempt_plan(self, query: &SearchQuery) -> Vec<(QueryVariant, SearchQuery)> {
        match self {
            Platform::LinkedIn => {
                let mut plan = vec![
                    (QueryVariant::Primary, query.clone()),
                    (QueryVariant::Alternate, query.clone()),
                ];
                if !query.is_worldwide() {
                    plan.push((QueryVariant::Primary, query.with_location(WORLDWIDE)));
                }
                plan
            }
            Platform::Naukri => vec![(QueryVariant::Primary, query.clone())],
        }
    }
}
