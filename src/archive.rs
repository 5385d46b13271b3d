//! Page rotation and file writes.
//!
//! Every page this tool renders embeds its own date in a
//! `<time datetime="YYYY-MM-DD">` attribute, and rotation is keyed on that
//! date rather than on the clock: the current pointer file is moved to
//! `archive_dir/<page_date>.html` before a new page is written. A page that
//! already belongs to the requested date is left in place, so rerunning the
//! same day overwrites instead of archiving a half-day-old copy.
//!
//! Rotation is best-effort: any failure is logged and the run continues,
//! because a stale pointer file is better than no page at all.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};

/// Archive file path for `date`: `archive_dir/YYYY-MM-DD.html`.
pub fn archive_path(archive_dir: &Path, date: NaiveDate) -> PathBuf {
    archive_dir.join(format!("{}.html", date.format("%Y-%m-%d")))
}

/// Reads the date a rendered page carries in its first
/// `<time datetime="...">` attribute. Returns `None` for pages without the
/// attribute or with one that is not `YYYY-MM-DD`.
pub fn embedded_page_date(html: &str) -> Option<NaiveDate> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("time[datetime]").ok()?;
    let value = document.select(&selector).next()?.value().attr("datetime")?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Moves the current pointer file into the archive under the date the page
/// itself claims. Pages without an embedded date are treated as yesterday's.
/// No-op when the file is absent or already belongs to `today`.
pub fn rotate_current(current_file: &Path, archive_dir: &Path, today: NaiveDate) {
    if !current_file.exists() {
        return;
    }

    let embedded = match std::fs::read_to_string(current_file) {
        Ok(html) => embedded_page_date(&html),
        Err(e) => {
            eprintln!(
                "Warning: could not read {}: {}",
                current_file.display(),
                e
            );
            return;
        }
    };

    let page_date = match embedded.or_else(|| today.pred_opt()) {
        Some(date) => date,
        None => return,
    };

    if page_date == today {
        // Same-day rerun, nothing to rotate.
        return;
    }

    if let Err(e) = std::fs::create_dir_all(archive_dir) {
        eprintln!(
            "Warning: could not create {}: {}",
            archive_dir.display(),
            e
        );
        return;
    }

    let target = archive_path(archive_dir, page_date);
    match std::fs::rename(current_file, &target) {
        Ok(()) => println!("Archived previous page to {}", target.display()),
        Err(e) => eprintln!("Warning: could not archive previous page: {}", e),
    }
}

/// Writes a rendered page, creating the parent directory if needed.
pub fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    std::fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))
}
