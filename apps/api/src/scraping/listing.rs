//! Normalizes actor dataset records into one listing shape.
//!
//! Actors name the same fields differently (LinkedIn links under `link`, Naukri
//! under `url`), so each field is looked up through an ordered list of keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scraping::client::RawRecord;
use crate::scraping::platform::Platform;

const TITLE_KEYS: &[&str] = &["title", "jobTitle", "positionName"];
const COMPANY_KEYS: &[&str] = &["companyName", "company"];
const LOCATION_KEYS: &[&str] = &["location", "jobLocation", "place"];

/// A job posting in the shape every consumer sees, regardless of source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub platform: Platform,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
}

impl JobListing {
    pub fn from_record(platform: Platform, record: &RawRecord) -> Self {
        Self {
            platform,
            title: first_text(record, TITLE_KEYS),
            company_name: first_text(record, COMPANY_KEYS),
            location: first_text(record, LOCATION_KEYS),
            url: first_text(record, platform.url_keys()),
        }
    }
}

/// First key holding a non-blank value. Numbers are stringified; nested values
/// like `{"company": {"name": ..}}` are looked through one level.
fn first_text(record: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(value_text)
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("name").and_then(value_text),
        _ => None,
    }
}
