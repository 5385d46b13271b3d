//! # Daily Devo
//!
//! A daily devotional page generator.
//!
//! Daily Devo resolves the verse of the day (local per-date cache first, then
//! a live fetch, then the previous day's verse), asks an LLM for a short
//! devotional on it, fills an HTML template, and maintains a dated archive
//! alongside the `today.html` current pointer. It is built to run once a day
//! from cron and to degrade instead of failing: a dead LLM still produces a
//! page, and a dead verse provider falls back to yesterday's verse.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Verse source │──▶│  Devotional  │──▶│   Renderer   │
//! │ cache + HTTP │   │  (LLM call)  │   │ {{KEY}} fill │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              │
//!                               ┌──────────────┤
//!                               ▼              ▼
//!                        ┌─────────────┐  ┌────────────┐
//!                        │ devotionals/│  │ today.html │
//!                        │ (archive)   │  │ dev.html   │
//!                        └─────────────┘  └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! devo verse                  # resolve and print the verse of the day
//! devo dev                    # render a preview page (dev.html)
//! devo generate               # production run: archive + today.html
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`cache`] | Per-date verse cache |
//! | [`provider`] | Verse-of-the-day HTTP client |
//! | [`resolve`] | Verse resolution policy |
//! | [`devotional`] | LLM commentary generation |
//! | [`template`] | `{{KEY}}` placeholder rendering |
//! | [`archive`] | Page rotation and file writes |
//! | [`generate`] | Command orchestrators |

pub mod archive;
pub mod cache;
pub mod config;
pub mod devotional;
pub mod generate;
pub mod models;
pub mod provider;
pub mod resolve;
pub mod template;
