//! Command orchestrators: `generate`, `dev`, and `verse`.
//!
//! Each run resolves a verse, optionally generates commentary, renders the
//! page template, and writes files. A run fails (non-zero exit) only when no
//! verse can be resolved at all; commentary failures degrade to a fixed
//! fallback body and the page is still written.

use anyhow::{bail, Result};
use chrono::NaiveDate;

use crate::archive;
use crate::cache::VerseCache;
use crate::config::Config;
use crate::devotional;
use crate::models::{DevotionalDocument, Verse};
use crate::provider::VerseProvider;
use crate::resolve;
use crate::template;

/// Production flow: rotate the current page into the archive, then write the
/// dated archive file and the current pointer file.
pub async fn run_generate(config: &Config, date: NaiveDate) -> Result<()> {
    let cache = VerseCache::new(&config.paths.verses_dir);
    let provider = VerseProvider::new(&config.verse);

    let verse = match resolve::resolve_verse_with_archive(
        &cache,
        &provider,
        &config.paths.archive_dir,
        &config.verse.version,
        date,
    )
    .await
    {
        Some(verse) => verse,
        None => bail!("No verse available for {}", date),
    };

    println!("devotional {}", date);
    println!("  verse: {} ({})", verse.reference, verse.version);

    let body = devotional_body(config, &verse).await;
    let document = DevotionalDocument::new(date, "Devotional", &verse, &body);
    let html = template::render_file(&config.paths.html_template, &document.replacements())?;

    archive::rotate_current(&config.paths.current_file, &config.paths.archive_dir, date);

    let dated = archive::archive_path(&config.paths.archive_dir, date);
    archive::write_page(&dated, &html)?;
    archive::write_page(&config.paths.current_file, &html)?;

    println!("  wrote: {}", dated.display());
    println!("  wrote: {}", config.paths.current_file.display());
    println!("ok");
    Ok(())
}

/// Development flow: same pipeline, but resolution skips the archived-page
/// rung and the only file touched is `paths.dev_file`.
pub async fn run_dev(config: &Config, date: NaiveDate) -> Result<()> {
    let cache = VerseCache::new(&config.paths.verses_dir);
    let provider = VerseProvider::new(&config.verse);

    let verse = match resolve::resolve_verse(&cache, &provider, date).await {
        Some(verse) => verse,
        None => bail!("No verse available for {}", date),
    };

    println!("devotional {} (dev)", date);
    println!("  verse: {} ({})", verse.reference, verse.version);

    let body = devotional_body(config, &verse).await;
    let document = DevotionalDocument::new(date, "Development Devotional", &verse, &body);
    let html = template::render_file(&config.paths.html_template, &document.replacements())?;

    archive::write_page(&config.paths.dev_file, &html)?;

    println!("  wrote: {}", config.paths.dev_file.display());
    println!("ok");
    Ok(())
}

/// Resolves and prints the verse for `date` without writing any page.
pub async fn run_verse(config: &Config, date: NaiveDate) -> Result<()> {
    let cache = VerseCache::new(&config.paths.verses_dir);
    let provider = VerseProvider::new(&config.verse);

    let verse = match resolve::resolve_verse(&cache, &provider, date).await {
        Some(verse) => verse,
        None => bail!("No verse available for {}", date),
    };

    println!("{} ({})", verse.reference, verse.version);
    println!("{}", verse.text);
    Ok(())
}

/// Generated commentary, or the fixed fallback body when generation fails.
async fn devotional_body(config: &Config, verse: &Verse) -> String {
    match devotional::generate(&config.llm, &config.paths.prompt_template, verse).await {
        Some(html) => html,
        None => {
            eprintln!("Devotional generation failed; using fallback content");
            devotional::APOLOGY_HTML.to_string()
        }
    }
}
