//! Devotional commentary generation.
//!
//! Builds a prompt from the configured template, issues a single synchronous
//! `POST` to the LLM messages endpoint, extracts the first generated content
//! block, and converts the returned Markdown to HTML.
//!
//! There are no retries: the call is attempted exactly once per run, and any
//! failure (non-200 status, transport error, unreadable template, malformed
//! response) is logged and mapped to `None`. The orchestrator substitutes
//! [`APOLOGY_HTML`] in that case, so a run still produces a page.

use anyhow::{bail, Result};
use std::path::Path;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::models::Verse;
use crate::template;

/// Fixed body used when generation fails. Already HTML; substituted verbatim,
/// never run back through the Markdown converter.
pub const APOLOGY_HTML: &str = "<p>We apologize, but we couldn't generate the devotional content \
for today. Please reflect on the verse below.</p>";

/// Wire version header required by the messages endpoint.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Generates the devotional HTML fragment for `verse`.
///
/// Returns `None` on any failure; the specific cause has already been logged
/// by then. On success the returned fragment is the Markdown-converted
/// commentary, ready to embed under `DEVOTIONAL_CONTENT`.
pub async fn generate(config: &LlmConfig, prompt_template: &Path, verse: &Verse) -> Option<String> {
    let template_text = match std::fs::read_to_string(prompt_template) {
        Ok(text) => text,
        Err(e) => {
            eprintln!(
                "Error reading prompt template {}: {}",
                prompt_template.display(),
                e
            );
            return None;
        }
    };

    let prompt = template::render_str(
        &template_text,
        &[
            ("VERSE_REFERENCE".to_string(), verse.reference.clone()),
            ("VERSE_TEXT".to_string(), verse.text.clone()),
        ],
    );

    match request_devotional(config, &prompt).await {
        Ok(text) => Some(markdown_to_html(&text)),
        Err(e) => {
            eprintln!("Error calling LLM API: {}", e);
            None
        }
    }
}

/// Sends the messages request and returns the first content block's text.
///
/// The API key is read from the configured environment variable at request
/// time; when unset the header is sent empty and the provider's
/// authentication error comes back as the non-200 arm below.
async fn request_devotional(config: &LlmConfig, prompt: &str) -> Result<String> {
    let api_key = std::env::var(&config.api_key_env).unwrap_or_default();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let body = serde_json::json!({
        "model": config.model,
        "max_tokens": config.max_tokens,
        "messages": [{ "role": "user", "content": prompt }],
    });

    let response = client
        .post(&config.endpoint)
        .header("Content-Type", "application/json")
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body_text = response.text().await.unwrap_or_default();
        bail!("LLM API error {}: {}", status, body_text);
    }

    let json: serde_json::Value = response.json().await?;
    extract_message_text(&json)
}

/// Extracts `content[0].text` from a messages-endpoint response body.
pub fn extract_message_text(json: &serde_json::Value) -> Result<String> {
    let text = json
        .get("content")
        .and_then(|c| c.as_array())
        .and_then(|blocks| blocks.first())
        .and_then(|block| block.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid LLM response: missing content[0].text"))?;
    Ok(text.to_string())
}

/// Converts the generated Markdown to HTML with tables, footnotes,
/// strikethrough, and smart punctuation enabled.
pub fn markdown_to_html(markdown: &str) -> String {
    use pulldown_cmark::{html, Options, Parser};

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_text() {
        let json = serde_json::json!({
            "content": [
                { "type": "text", "text": "A short reflection." },
                { "type": "text", "text": "ignored second block" }
            ],
            "model": "claude-sonnet-4-20250514"
        });
        assert_eq!(extract_message_text(&json).unwrap(), "A short reflection.");
    }

    #[test]
    fn test_extract_missing_content_errors() {
        let json = serde_json::json!({ "error": { "type": "overloaded_error" } });
        assert!(extract_message_text(&json).is_err());
    }

    #[test]
    fn test_extract_empty_content_array_errors() {
        let json = serde_json::json!({ "content": [] });
        assert!(extract_message_text(&json).is_err());
    }

    #[test]
    fn test_markdown_paragraph_and_emphasis() {
        let html = markdown_to_html("Be **still** and know.");
        assert_eq!(html, "<p>Be <strong>still</strong> and know.</p>\n");
    }

    #[test]
    fn test_markdown_heading_and_list() {
        let html = markdown_to_html("## Reflection\n\n- pray\n- rest\n");
        assert!(html.contains("<h2>Reflection</h2>"));
        assert!(html.contains("<li>pray</li>"));
    }

    #[test]
    fn test_markdown_blockquote() {
        let html = markdown_to_html("> selah");
        assert!(html.contains("<blockquote>"));
    }

    #[test]
    fn test_apology_is_a_single_paragraph() {
        assert!(APOLOGY_HTML.starts_with("<p>"));
        assert!(APOLOGY_HTML.ends_with("</p>"));
    }
}
