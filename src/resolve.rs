//! Verse resolution policy.
//!
//! A verse for a given date is looked up through a fixed ladder: the cache
//! for that date, one live fetch (cached on success), the previous day's
//! cache, and in the production flow the previous day's archived page. The
//! first rung that yields a verse wins; when all of them fail there is
//! nothing worth rendering and the caller reports the run as failed.

use chrono::NaiveDate;
use scraper::{Html, Selector};
use std::path::Path;

use crate::cache::VerseCache;
use crate::models::Verse;
use crate::provider::VerseProvider;

/// Resolves the verse for `date` via cache, live fetch, then previous-day
/// cache. A verse fetched live is written back to the cache; a write-back
/// failure is logged and the verse is still used.
pub async fn resolve_verse(
    cache: &VerseCache,
    provider: &VerseProvider,
    date: NaiveDate,
) -> Option<Verse> {
    if let Some(verse) = cache.load(date) {
        return Some(verse);
    }

    if let Some(verse) = provider.fetch_today().await {
        if let Err(e) = cache.save(date, &verse) {
            eprintln!("Warning: failed to cache verse: {}", e);
        }
        return Some(verse);
    }

    let previous = date.pred_opt()?;
    if let Some(verse) = cache.load(previous) {
        println!("Using previous day's verse as fallback");
        return Some(verse);
    }

    None
}

/// [`resolve_verse`] plus a last-resort rung used by the production flow:
/// when the ladder comes up empty, try to reconstruct a verse from the
/// previous day's archived page under `archive_dir`.
pub async fn resolve_verse_with_archive(
    cache: &VerseCache,
    provider: &VerseProvider,
    archive_dir: &Path,
    version: &str,
    date: NaiveDate,
) -> Option<Verse> {
    if let Some(verse) = resolve_verse(cache, provider, date).await {
        return Some(verse);
    }

    let previous = date.pred_opt()?;
    let page = archive_dir.join(format!("{}.html", previous.format("%Y-%m-%d")));
    let html = std::fs::read_to_string(&page).ok()?;
    let verse = verse_from_archived_page(&html, version)?;
    println!("Recovered verse from archived page {}", page.display());
    Some(verse)
}

/// Pulls a verse out of a rendered page. Pages this tool writes mark the
/// verse up as `<figure class="verse">` holding a `<blockquote>`/`<cite>`
/// pair, and those scoped elements are read first; generated commentary can
/// legitimately contain blockquotes of its own, so the bare first
/// `<blockquote>`/`<cite>` are only a fallback for pages without the figure.
/// The page does not record a translation, so `version` supplies one.
/// Returns `None` when no text or reference is found.
pub fn verse_from_archived_page(html: &str, version: &str) -> Option<Verse> {
    let document = Html::parse_document(html);
    let figure_quote = Selector::parse("figure.verse blockquote").ok()?;
    let figure_cite = Selector::parse("figure.verse cite").ok()?;
    let any_quote = Selector::parse("blockquote").ok()?;
    let any_cite = Selector::parse("cite").ok()?;

    let text =
        first_text(&document, &figure_quote).or_else(|| first_text(&document, &any_quote))?;
    let reference =
        first_text(&document, &figure_cite).or_else(|| first_text(&document, &any_cite))?;

    Some(Verse {
        text,
        reference,
        version: version.to_string(),
    })
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    let element = document.select(selector).next()?;
    let joined: String = element.text().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VerseConfig;
    use tempfile::TempDir;

    fn sample_verse() -> Verse {
        Verse {
            text: "Be still, and know that I am God.".to_string(),
            reference: "Psalm 46:10".to_string(),
            version: "ESV".to_string(),
        }
    }

    /// A provider pointed at a port nothing listens on, so every fetch fails
    /// fast with a connection error.
    fn dead_provider() -> VerseProvider {
        VerseProvider::new(&VerseConfig {
            endpoint: "http://127.0.0.1:9/votd".to_string(),
            version: "ESV".to_string(),
        })
    }

    #[tokio::test]
    async fn test_cache_hit_wins_without_network() {
        let dir = TempDir::new().unwrap();
        let cache = VerseCache::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        cache.save(date, &sample_verse()).unwrap();

        let resolved = resolve_verse(&cache, &dead_provider(), date).await;
        assert_eq!(resolved, Some(sample_verse()));
    }

    #[tokio::test]
    async fn test_previous_day_fallback() {
        let dir = TempDir::new().unwrap();
        let cache = VerseCache::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        cache.save(date.pred_opt().unwrap(), &sample_verse()).unwrap();

        let resolved = resolve_verse(&cache, &dead_provider(), date).await;
        assert_eq!(resolved, Some(sample_verse()));
    }

    #[tokio::test]
    async fn test_repeat_resolution_leaves_cache_unchanged() {
        let dir = TempDir::new().unwrap();
        let cache = VerseCache::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        cache.save(date, &sample_verse()).unwrap();
        let before = std::fs::read_to_string(cache.record_path(date)).unwrap();

        resolve_verse(&cache, &dead_provider(), date).await;
        resolve_verse(&cache, &dead_provider(), date).await;

        let after = std::fs::read_to_string(cache.record_path(date)).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_unresolvable_returns_none() {
        let dir = TempDir::new().unwrap();
        let cache = VerseCache::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();

        let resolved = resolve_verse(&cache, &dead_provider(), date).await;
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn test_archive_fallback_recovers_verse() {
        let dir = TempDir::new().unwrap();
        let cache = VerseCache::new(&dir.path().join("verses"));
        let archive_dir = dir.path().join("devotionals");
        std::fs::create_dir_all(&archive_dir).unwrap();
        std::fs::write(
            archive_dir.join("2024-03-01.html"),
            "<html><body>\
             <blockquote>Be still, and know that I am God.</blockquote>\
             <cite>Psalm 46:10</cite>\
             </body></html>",
        )
        .unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let resolved =
            resolve_verse_with_archive(&cache, &dead_provider(), &archive_dir, "ESV", date).await;
        assert_eq!(resolved, Some(sample_verse()));
    }

    #[tokio::test]
    async fn test_archive_fallback_without_page_returns_none() {
        let dir = TempDir::new().unwrap();
        let cache = VerseCache::new(&dir.path().join("verses"));
        let archive_dir = dir.path().join("devotionals");

        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let resolved =
            resolve_verse_with_archive(&cache, &dead_provider(), &archive_dir, "ESV", date).await;
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_archived_page_extraction() {
        let html = "<html><body><article>\
                    <blockquote class=\"verse-text\">For God so loved the world</blockquote>\
                    <p><cite>John 3:16</cite></p>\
                    </article></body></html>";
        let verse = verse_from_archived_page(html, "NIV").unwrap();
        assert_eq!(verse.text, "For God so loved the world");
        assert_eq!(verse.reference, "John 3:16");
        assert_eq!(verse.version, "NIV");
    }

    #[test]
    fn test_archived_page_prefers_verse_figure_over_commentary_quote() {
        let html = "<html><body><article>\
                    <section class=\"devotional-content\">\
                    <blockquote><p>A line the commentary chose to quote.</p></blockquote>\
                    </section>\
                    <figure class=\"verse\">\
                    <blockquote class=\"verse-text\">Be still, and know that I am God.</blockquote>\
                    <figcaption><cite>Psalm 46:10</cite></figcaption>\
                    </figure>\
                    </article></body></html>";
        let verse = verse_from_archived_page(html, "ESV").unwrap();
        assert_eq!(verse.text, "Be still, and know that I am God.");
        assert_eq!(verse.reference, "Psalm 46:10");
    }

    #[test]
    fn test_archived_page_first_blockquote_wins() {
        let html = "<blockquote>first</blockquote>\
                    <blockquote>second</blockquote>\
                    <cite>Ref 1:1</cite>";
        let verse = verse_from_archived_page(html, "ESV").unwrap();
        assert_eq!(verse.text, "first");
    }

    #[test]
    fn test_archived_page_missing_cite() {
        let html = "<blockquote>text without a reference</blockquote>";
        assert!(verse_from_archived_page(html, "ESV").is_none());
    }

    #[test]
    fn test_archived_page_blank_blockquote() {
        let html = "<blockquote>   </blockquote><cite>Ref 1:1</cite>";
        assert!(verse_from_archived_page(html, "ESV").is_none());
    }

    #[test]
    fn test_archived_page_nested_markup_flattened() {
        let html = "<blockquote>Be <em>still</em>, and know</blockquote><cite>Psalm 46:10</cite>";
        let verse = verse_from_archived_page(html, "ESV").unwrap();
        assert_eq!(verse.text, "Be still, and know");
    }
}
