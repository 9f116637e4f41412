//! Configuration management for Estuary.
//!
//! Configuration is read from `~/.config/estuary/config.toml` unless a path
//! is given on the command line. If the default file doesn't exist, a
//! commented default configuration is created.

pub mod sources;

pub use sources::{CategoryConfig, SourceConfig, DEFAULT_EXCLUDE_PATTERN, DEFAULT_MAX_ITEMS};

use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::Category;
use crate::fetcher::http_fetcher::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::pipeline::DEFAULT_CONCURRENCY;
use crate::source::feed::DEFAULT_FEED_URL;
use crate::source::search::{DEFAULT_REGION_CODE, DEFAULT_RELEVANCE_LANGUAGE, DEFAULT_SEARCH_URL};

pub const DEFAULT_API_KEY_ENV: &str = "YOUTUBE_API_KEY";
pub const DEFAULT_REFERENCE_ZONE: &str = "Europe/London";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
    pub categories: Vec<CategoryConfig>,
}

/// Upstream endpoints and request settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Environment variable holding the search API key
    pub api_key_env: String,
    pub search_url: String,
    pub feed_url: String,
    pub region_code: String,
    pub relevance_language: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            feed_url: DEFAULT_FEED_URL.to_string(),
            region_code: DEFAULT_REGION_CODE.to_string(),
            relevance_language: DEFAULT_RELEVANCE_LANGUAGE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// IANA zone used to decide what "yesterday" means
    pub reference_zone: String,
    /// Source calls in flight per category
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference_zone: DEFAULT_REFERENCE_ZONE.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl PipelineConfig {
    pub fn zone(&self) -> Result<Tz, ConfigError> {
        self.reference_zone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimeZone(self.reference_zone.clone()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("public/content"),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. At the default location a missing file
    /// is created with the commented default content. Missing fields use
    /// default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    tracing::info!(path = %default_path.display(), "created default config");
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: config_path,
                source,
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/estuary/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("estuary").join("config.toml"))
    }

    /// Validate and compile every category.
    ///
    /// All patterns are compiled here so a bad regex aborts before any
    /// network activity.
    pub fn categories(&self) -> Result<Vec<Category>, ConfigError> {
        let mut names = HashSet::new();
        let mut categories = Vec::with_capacity(self.categories.len());

        for category in &self.categories {
            let compiled = category.compile()?;
            if !names.insert(compiled.name.clone()) {
                return Err(ConfigError::DuplicateCategory(compiled.name));
            }
            categories.push(compiled);
        }

        Ok(categories)
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    pub fn default_config_content() -> &'static str {
        r##"# Estuary configuration
#
# Each [[categories]] entry becomes one <output.dir>/<name>.json artifact.
# Sources are queried in the order listed; when two sources return the same
# video, the earlier source's copy is kept.
#
# Source kinds (exactly one per source):
#   search     = "text"     keyed search API query (needs the API key)
#   channel    = "UC..."    public upload feed of a channel
#   feed_query = "text"     public search feed
#
# Optional per source:
#   title_pattern = "regex" case-insensitive; overrides the category `include`
#   channels = ["name"]     case-insensitive substring allow-list
#   max_results = 50        at most 50

[provider]
# The API key is read from this environment variable (a .env file works too)
api_key_env = "YOUTUBE_API_KEY"
region_code = "GB"
relevance_language = "en"
timeout_secs = 10

[pipeline]
reference_zone = "Europe/London"
concurrency = 4

[output]
dir = "public/content"

[[categories]]
name = "football"
max_items = 100
include = "highlight|goal|extended"
window = "previous_day"
sources = [
    { search = "Premier League highlights" },
    { search = "EFL Championship highlights" },
    { search = "La Liga highlights" },
    { search = "Serie A highlights" },
    { search = "Bundesliga highlights" },
    { search = "Ligue 1 highlights" },
    { search = "Champions League highlights" },
    { search = "Europa League highlights" },
    { search = "FA Cup highlights" },
]

[[categories]]
name = "trailers"
include = "trailer"
sources = [
    { search = "official movie trailer 2025" },
    { search = "new movie trailers" },
    { search = "upcoming movies english trailer" },
    { search = "hollywood movie trailers" },
    { search = "netflix trailer" },
]

[[categories]]
name = "ukpop"
include = "official|music|video"
sources = [
    { search = "Official UK Top 40 music video" },
    { search = "Official Charts Top 100 music videos" },
    { search = "BBC Radio 1 Official Chart" },
    { search = "UK pop hits official video" },
    { search = "Top UK songs Vevo" },
]

[[categories]]
name = "viral"
include = "funny|viral|fail|amazing|crazy|epic|moment|caught"
sources = [
    { search = "funny viral videos" },
    { search = "failarmy" },
    { search = "try not to laugh" },
    { search = "crazy moments caught on camera" },
    { search = "sports viral clips" },
    { search = "best funny moments" },
    { search = "epic fails" },
    { search = "amazing people" },
    { search = "top tiktok compilations" },
]
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid pattern {pattern:?} in category {category}: {source}")]
    InvalidPattern {
        category: String,
        pattern: String,
        source: regex::Error,
    },

    #[error("Invalid source in category {category}: {reason}")]
    InvalidSource { category: String, reason: String },

    #[error("Invalid category name {0:?}: use letters, digits, '-' or '_'")]
    InvalidCategoryName(String),

    #[error("Category {0} is defined more than once")]
    DuplicateCategory(String),

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
}
