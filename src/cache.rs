//! Per-date verse cache.
//!
//! One pretty-printed JSON record per calendar date under the verses
//! directory (`verses/<YYYY-MM-DD>.json`). Records accumulate indefinitely,
//! one per day; there is no eviction and no record is ever rewritten.
//!
//! Reads fail soft: a missing file is an ordinary miss, and a corrupt or
//! field-incomplete record is logged and treated as a miss so a damaged
//! cache can never take the run down.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::models::{CachedVerseRecord, Verse};

pub struct VerseCache {
    dir: PathBuf,
}

impl VerseCache {
    pub fn new(dir: &Path) -> Self {
        VerseCache {
            dir: dir.to_path_buf(),
        }
    }

    /// Path of the record file for `date`.
    pub fn record_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.json", date.format("%Y-%m-%d")))
    }

    /// Looks up the cached verse for `date`. Returns `None` when the record
    /// file does not exist, cannot be read, is not valid JSON, or is missing
    /// a required field; anything except a plain miss gets one log line.
    pub fn load(&self, date: NaiveDate) -> Option<Verse> {
        let path = self.record_path(date);
        if !path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading cached verse {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<CachedVerseRecord>(&content) {
            Ok(record) => {
                println!("Using cached verse for {}", date.format("%Y-%m-%d"));
                Some(record.into_verse())
            }
            Err(e) => {
                eprintln!("Error parsing cached verse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Persists `verse` as the record for `date`. Creates the verses
    /// directory if needed (idempotent). Callers treat a returned error as a
    /// warning; a failed cache write never aborts the run.
    pub fn save(&self, date: NaiveDate, verse: &Verse) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create verses directory: {}", self.dir.display()))?;

        let record = CachedVerseRecord::new(date, verse);
        let json = serde_json::to_string_pretty(&record)?;

        let path = self.record_path(date);
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write cached verse: {}", path.display()))?;

        println!("Cached verse for {}", date.format("%Y-%m-%d"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_verse() -> Verse {
        Verse {
            text: "Trust in the LORD with all your heart".to_string(),
            reference: "Proverbs 3:5".to_string(),
            version: "ESV".to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let cache = VerseCache::new(&tmp.path().join("verses"));
        let verse = sample_verse();

        cache.save(date(2024, 3, 2), &verse).unwrap();
        let loaded = cache.load(date(2024, 3, 2)).unwrap();
        assert_eq!(loaded, verse);
    }

    #[test]
    fn test_load_missing_record_is_none() {
        let tmp = TempDir::new().unwrap();
        let cache = VerseCache::new(&tmp.path().join("verses"));
        assert!(cache.load(date(2024, 3, 2)).is_none());
    }

    #[test]
    fn test_load_ignores_other_dates() {
        let tmp = TempDir::new().unwrap();
        let cache = VerseCache::new(&tmp.path().join("verses"));
        cache.save(date(2024, 3, 1), &sample_verse()).unwrap();
        assert!(cache.load(date(2024, 3, 2)).is_none());
        assert!(cache.load(date(2024, 3, 1)).is_some());
    }

    #[test]
    fn test_corrupt_record_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("verses");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("2024-03-02.json"), "{not json").unwrap();

        let cache = VerseCache::new(&dir);
        assert!(cache.load(date(2024, 3, 2)).is_none());
    }

    #[test]
    fn test_record_missing_required_field_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("verses");
        std::fs::create_dir_all(&dir).unwrap();
        // No "text" field.
        std::fs::write(
            dir.join("2024-03-02.json"),
            r#"{"date": "2024-03-02", "reference": "John 3:16", "version": "ESV"}"#,
        )
        .unwrap();

        let cache = VerseCache::new(&dir);
        assert!(cache.load(date(2024, 3, 2)).is_none());
    }

    #[test]
    fn test_record_without_fetched_at_still_loads() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("verses");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("2024-03-02.json"),
            r#"{"date": "2024-03-02", "reference": "John 3:16", "text": "For God so loved", "version": "ESV"}"#,
        )
        .unwrap();

        let cache = VerseCache::new(&dir);
        let verse = cache.load(date(2024, 3, 2)).unwrap();
        assert_eq!(verse.reference, "John 3:16");
    }

    #[test]
    fn test_save_creates_directory_and_pretty_prints() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("deep").join("verses");
        let cache = VerseCache::new(&dir);

        cache.save(date(2024, 3, 2), &sample_verse()).unwrap();

        let content = std::fs::read_to_string(dir.join("2024-03-02.json")).unwrap();
        assert!(content.contains('\n'), "record should be pretty-printed");
        assert!(content.contains("\"fetched_at\""));
        assert!(content.contains("\"date\": \"2024-03-02\""));
    }

    #[test]
    fn test_resave_same_date_keeps_single_record() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("verses");
        let cache = VerseCache::new(&dir);

        cache.save(date(2024, 3, 2), &sample_verse()).unwrap();
        cache.save(date(2024, 3, 2), &sample_verse()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
