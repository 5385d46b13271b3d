//! Verse-of-the-day provider adapter.
//!
//! Wraps the BibleGateway verse-of-the-day endpoint
//! (`GET <endpoint>?format=json&version=<code>`), normalizing success and
//! failure into `Option<Verse>`: the adapter logs any transport, status, or
//! decode failure and returns `None` rather than propagating a raw fault.
//!
//! The provider text arrives decorated with HTML tags and typographic
//! entities (`&ldquo;…&rdquo;`); [`clean_verse_text`] flattens it to plain
//! text so the cached and rendered verse carries no markup.

use anyhow::{bail, Result};
use scraper::Html;

use crate::config::VerseConfig;
use crate::models::Verse;

pub struct VerseProvider {
    endpoint: String,
    version: String,
    client: reqwest::Client,
}

impl VerseProvider {
    /// Builds the adapter for the configured endpoint and translation code.
    /// The client deliberately carries no request timeout; only the LLM call
    /// is deadline-bounded.
    pub fn new(config: &VerseConfig) -> Self {
        VerseProvider {
            endpoint: config.endpoint.clone(),
            version: config.version.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetches today's verse. Every failure mode is logged and mapped to
    /// `None`; callers fall back per the resolution policy.
    pub async fn fetch_today(&self) -> Option<Verse> {
        match self.request().await {
            Ok(verse) => Some(verse),
            Err(e) => {
                eprintln!("Error fetching verse from provider: {}", e);
                None
            }
        }
    }

    async fn request(&self) -> Result<Verse> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("version", self.version.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("verse provider error {}: {}", status, body);
        }

        let json: serde_json::Value = response.json().await?;
        parse_votd_response(&json, &self.version)
    }
}

/// Parses the provider's JSON envelope `{"votd": {...}}` into a [`Verse`].
///
/// `reference` comes from `display_ref` (falling back to `reference`), and
/// `version` from `version_id`, falling back to the configured translation
/// code when the payload omits it.
pub fn parse_votd_response(json: &serde_json::Value, fallback_version: &str) -> Result<Verse> {
    let votd = json
        .get("votd")
        .ok_or_else(|| anyhow::anyhow!("Invalid verse response: missing votd object"))?;

    let text = votd
        .get("text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid verse response: missing text"))?;

    let reference = votd
        .get("display_ref")
        .or_else(|| votd.get("reference"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid verse response: missing reference"))?;

    let version = votd
        .get("version_id")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback_version);

    let text = clean_verse_text(text);
    if text.is_empty() {
        bail!("Invalid verse response: empty text after cleanup");
    }

    Ok(Verse {
        text,
        reference: reference.trim().to_string(),
        version: version.to_string(),
    })
}

/// Flattens the provider's HTML-decorated `text` field to plain text: parse
/// the fragment, collect its text nodes, trim. The parser decodes entities
/// in any form; non-breaking spaces are normalized to plain spaces.
pub fn clean_verse_text(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    let joined: String = fragment.root_element().text().collect();
    joined.replace('\u{a0}', " ").trim().to_string()
}
