//! # Daily Devo CLI (`devo`)
//!
//! The `devo` binary renders the daily devotional page: it resolves the verse
//! of the day, generates commentary for it, fills the HTML template, and
//! maintains the dated archive alongside the current `today.html` pointer.
//!
//! ## Usage
//!
//! ```bash
//! devo --config ./config/devo.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `devo generate` | Produce today's page, archive yesterday's, update `today.html` |
//! | `devo dev` | Produce a development page (`dev.html`) without touching the archive |
//! | `devo verse` | Resolve and print the verse of the day without writing anything |
//!
//! ## Examples
//!
//! ```bash
//! # Daily production run (what the cron job executes)
//! devo generate --config ./config/devo.toml
//!
//! # Regenerate a specific date, e.g. after fixing a template
//! devo generate --date 2024-03-02
//!
//! # Preview locally without touching today.html or the archive
//! devo dev
//!
//! # Check what verse a run would use
//! devo verse
//! ```

mod archive;
mod cache;
mod config;
mod devotional;
mod generate;
mod models;
mod provider;
mod resolve;
mod template;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Daily Devo CLI — a daily devotional page generator.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/devo.example.toml` for a full example; every setting
/// has a default, and a missing config file is treated as all-defaults.
#[derive(Parser)]
#[command(
    name = "devo",
    about = "Daily Devo — verse of the day, generated commentary, static HTML",
    version,
    long_about = "Daily Devo renders a static devotional page once a day: it resolves the verse \
    of the day (local cache first, then a live fetch, then yesterday's verse), asks an LLM for a \
    short devotional on it, fills an HTML template, and rotates the previous page into a dated \
    archive."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/devo.toml`. Paths, the verse provider, and the
    /// LLM settings are read from this file; a missing file means defaults.
    #[arg(long, global = true, default_value = "./config/devo.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Generate the production page for a date.
    ///
    /// Resolves the verse (cache, live fetch, previous day, archived page),
    /// generates commentary, renders the template, moves the previous
    /// current page into the archive, and writes both the dated archive file
    /// and the current pointer file. Fails only when no verse is resolvable;
    /// a commentary failure degrades to a fixed fallback body.
    Generate {
        /// Date to generate for (YYYY-MM-DD). Defaults to the local date.
        #[arg(long)]
        date: Option<String>,
    },

    /// Generate a development page.
    ///
    /// Same pipeline as `generate`, but the only file written is the
    /// development page, so the archive and `today.html` stay untouched.
    /// Useful for template and prompt iteration.
    Dev {
        /// Date to generate for (YYYY-MM-DD). Defaults to the local date.
        #[arg(long)]
        date: Option<String>,
    },

    /// Resolve and print the verse for a date.
    ///
    /// Runs the cache-then-fetch resolution and prints the reference,
    /// translation, and text. Writes no page files; a verse fetched live is
    /// still cached for later runs.
    Verse {
        /// Date to resolve (YYYY-MM-DD). Defaults to the local date.
        #[arg(long)]
        date: Option<String>,
    },
}

/// Parse a `--date` value, defaulting to the local calendar date.
fn resolve_date(flag: Option<String>) -> anyhow::Result<NaiveDate> {
    match flag {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}': expected YYYY-MM-DD", s)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::Config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Generate { date } => {
            generate::run_generate(&cfg, resolve_date(date)?).await?;
        }
        Commands::Dev { date } => {
            generate::run_dev(&cfg, resolve_date(date)?).await?;
        }
        Commands::Verse { date } => {
            generate::run_verse(&cfg, resolve_date(date)?).await?;
        }
    }

    Ok(())
}
