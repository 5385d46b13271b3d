//! Literal `{{KEY}}` placeholder substitution.
//!
//! One engine shared by the prompt and HTML paths so the placeholder syntax
//! lives in exactly one place. Substitution is a single left-to-right pass:
//! replaced text is never re-scanned, so a replacement value that itself
//! contains a `{{...}}` token cannot trigger a second substitution.
//!
//! Tokens with no entry in the replacement mapping pass through unchanged,
//! which keeps existing templates with extra placeholders working.

use anyhow::{Context, Result};
use std::path::Path;

/// Substitutes `{{KEY}}` tokens in `template` using `replacements`.
///
/// Recognized tokens are replaced by their mapped value; unknown tokens and
/// unterminated `{{` sequences are emitted verbatim.
pub fn render_str(template: &str, replacements: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) => {
                let key = &after_open[..end];
                match replacements.iter().find(|(k, _)| k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        // Unknown placeholder: emit the token unchanged.
                        out.push_str(&rest[start..start + 2 + end + 2]);
                    }
                }
                rest = &after_open[end + 2..];
            }
            None => {
                // No closing braces anywhere after this point.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Reads the template at `path` and renders it with `replacements`.
pub fn render_file(path: &Path, replacements: &[(String, String)]) -> Result<String> {
    let template = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template file: {}", path.display()))?;
    Ok(render_str(&template, replacements))
}
