use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration, loaded from a TOML file. Every section and field
/// has a default, so a bare `devo generate` works in any directory that
/// carries a `templates/` directory and nothing else.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub verse: VerseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Filesystem layout: where cached verses, archived pages, the current
/// pointer file, and the two templates live. Relative paths resolve against
/// the working directory.
#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    #[serde(default = "default_verses_dir")]
    pub verses_dir: PathBuf,
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,
    #[serde(default = "default_current_file")]
    pub current_file: PathBuf,
    #[serde(default = "default_dev_file")]
    pub dev_file: PathBuf,
    #[serde(default = "default_prompt_template")]
    pub prompt_template: PathBuf,
    #[serde(default = "default_html_template")]
    pub html_template: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            verses_dir: default_verses_dir(),
            archive_dir: default_archive_dir(),
            current_file: default_current_file(),
            dev_file: default_dev_file(),
            prompt_template: default_prompt_template(),
            html_template: default_html_template(),
        }
    }
}

fn default_verses_dir() -> PathBuf {
    PathBuf::from("verses")
}
fn default_archive_dir() -> PathBuf {
    PathBuf::from("devotionals")
}
fn default_current_file() -> PathBuf {
    PathBuf::from("today.html")
}
fn default_dev_file() -> PathBuf {
    PathBuf::from("dev.html")
}
fn default_prompt_template() -> PathBuf {
    PathBuf::from("templates/devotional_prompt.txt")
}
fn default_html_template() -> PathBuf {
    PathBuf::from("templates/devotional_template.html")
}

/// Verse-of-the-day provider settings. The endpoint is queried with
/// `?format=json&version=<version>`.
#[derive(Debug, Deserialize, Clone)]
pub struct VerseConfig {
    #[serde(default = "default_verse_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_verse_version")]
    pub version: String,
}

impl Default for VerseConfig {
    fn default() -> Self {
        VerseConfig {
            endpoint: default_verse_endpoint(),
            version: default_verse_version(),
        }
    }
}

fn default_verse_endpoint() -> String {
    "https://www.biblegateway.com/votd/get/".to_string()
}
fn default_verse_version() -> String {
    "ESV".to_string()
}

/// LLM provider settings for devotional generation. The API key is read from
/// the environment variable named by `api_key_env` at request time; an unset
/// key is not an error here, it surfaces as an authentication failure from
/// the provider.
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_llm_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}
fn default_llm_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}
fn default_max_tokens() -> u32 {
    1500
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

impl Config {
    /// Loads configuration, treating a missing file as "use the defaults".
    /// A file that exists but fails to read or parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Config> {
        if path.exists() {
            load_config(path)
        } else {
            Ok(Config::default())
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.llm.max_tokens == 0 {
        anyhow::bail!("llm.max_tokens must be > 0");
    }

    if config.llm.timeout_secs == 0 {
        anyhow::bail!("llm.timeout_secs must be > 0");
    }

    Ok(config)
}
