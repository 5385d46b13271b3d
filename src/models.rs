//! Core data models used throughout daily-devo.
//!
//! These types represent the verse, its persisted cache form, and the
//! rendered document that flow through the resolution and generation
//! pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single scripture passage as produced by the cache or the live provider.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub text: String,
    pub reference: String,
    pub version: String,
}

/// Persisted form of a [`Verse`]: one JSON record per calendar date under the
/// verses directory, named `<YYYY-MM-DD>.json`. Created on the first
/// successful live fetch for that date and never mutated afterwards.
///
/// `fetched_at` is written on save but tolerated when absent on load; the
/// other four fields are required for a record to count as valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedVerseRecord {
    pub date: NaiveDate,
    pub reference: String,
    pub text: String,
    pub version: String,
    #[serde(default)]
    pub fetched_at: String,
}

impl CachedVerseRecord {
    /// Builds the record persisted for `date`, stamping the fetch time.
    pub fn new(date: NaiveDate, verse: &Verse) -> Self {
        CachedVerseRecord {
            date,
            reference: verse.reference.clone(),
            text: verse.text.clone(),
            version: verse.version.clone(),
            fetched_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
    }

    pub fn into_verse(self) -> Verse {
        Verse {
            text: self.text,
            reference: self.reference,
            version: self.version,
        }
    }
}

/// A fully assembled page for one run: everything the HTML template needs.
/// Built for a single run and dropped after the page is written.
#[derive(Debug, Clone)]
pub struct DevotionalDocument {
    pub date: NaiveDate,
    pub page_title: String,
    pub verse_reference: String,
    pub verse_text: String,
    pub html_body: String,
}

impl DevotionalDocument {
    /// Assembles the document for `date` with the given title prefix
    /// (`"Devotional"` in production, `"Development Devotional"` in dev runs).
    pub fn new(date: NaiveDate, title_prefix: &str, verse: &Verse, html_body: &str) -> Self {
        let date_formatted = format_date_long(date);
        DevotionalDocument {
            date,
            page_title: format!("{} for {}", title_prefix, date_formatted),
            verse_reference: verse.reference.clone(),
            verse_text: verse.text.clone(),
            html_body: html_body.to_string(),
        }
    }

    /// The replacement mapping handed to the template engine. Carries the five
    /// page placeholders plus `DATE_ISO`, which stamps each page with its own
    /// machine-readable date (read back during archive rotation).
    pub fn replacements(&self) -> Vec<(String, String)> {
        vec![
            ("PAGE_TITLE".to_string(), self.page_title.clone()),
            ("DATE_FORMATTED".to_string(), format_date_long(self.date)),
            ("DATE_ISO".to_string(), self.date.format("%Y-%m-%d").to_string()),
            ("VERSE_REFERENCE".to_string(), self.verse_reference.clone()),
            ("VERSE_TEXT".to_string(), self.verse_text.clone()),
            ("DEVOTIONAL_CONTENT".to_string(), self.html_body.clone()),
        ]
    }
}

/// Human-readable date used in page titles and the `DATE_FORMATTED`
/// placeholder, e.g. `March 02, 2024`.
pub fn format_date_long(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}
