//! Application configuration structures.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::ContestId;

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Remote file host layout
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Local output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Batch scheduling settings
    #[serde(default)]
    pub download: DownloadConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        Url::parse(&self.remote.base_url)
            .map_err(|e| AppError::validation(format!("remote.base_url is invalid: {e}")))?;
        if self.output.data_dir.as_os_str().is_empty() {
            return Err(AppError::validation("output.data_dir is empty"));
        }
        if self.download.max_concurrent == Some(0) {
            return Err(AppError::validation(
                "download.max_concurrent must be > 0 when set",
            ));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Layout of the remote static file host.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Prefix every resource URL is built from
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Directory holding `{id}.jpg` cartoons
    #[serde(default = "defaults::cartoons_dir")]
    pub cartoons_dir: String,

    /// Directory holding `{id}.csv` caption summaries
    #[serde(default = "defaults::summaries_dir")]
    pub summaries_dir: String,

    /// Path of the shared winners document
    #[serde(default = "defaults::winners_path")]
    pub winners_path: String,
}

impl RemoteConfig {
    fn join(&self, rest: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), rest)
    }

    /// URL of the cartoon image for a contest.
    pub fn cartoon_url(&self, id: ContestId) -> String {
        self.join(&format!("{}/{id}.jpg", self.cartoons_dir))
    }

    /// URL of the caption summary for a contest.
    pub fn summary_url(&self, id: ContestId) -> String {
        self.join(&format!("{}/{id}.csv", self.summaries_dir))
    }

    /// URL of the winners document.
    pub fn winners_url(&self) -> String {
        self.join(&self.winners_path)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            cartoons_dir: defaults::cartoons_dir(),
            summaries_dir: defaults::summaries_dir(),
            winners_path: defaults::winners_path(),
        }
    }
}

/// Local output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory for per-contest directories
    #[serde(default = "defaults::data_dir")]
    pub data_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
        }
    }
}

/// Batch scheduling settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadConfig {
    /// Upper bound on contests in flight; unbounded when absent
    #[serde(default)]
    pub max_concurrent: Option<usize>,
}

/// Which contests a run should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub start: ContestId,
    pub end: ContestId,
    /// Explicit contests; takes precedence over `start..=end`
    pub list: Option<Vec<ContestId>>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            start: defaults::START,
            end: defaults::END,
            list: None,
        }
    }
}

impl Selection {
    /// Resolve the selection to a deduplicated, ordered set of contest IDs.
    pub fn resolve_identifiers(&self) -> BTreeSet<ContestId> {
        match &self.list {
            Some(list) => list.iter().copied().collect(),
            None => (self.start..=self.end).collect(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use crate::models::ContestId;

    pub const START: ContestId = 660;
    pub const END: ContestId = 790;

    pub fn user_agent() -> String {
        concat!("contest-fetch/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }

    pub fn base_url() -> String {
        "https://raw.githubusercontent.com/nextml/caption-contest-data/gh-pages".into()
    }
    pub fn cartoons_dir() -> String {
        "cartoons".into()
    }
    pub fn summaries_dir() -> String {
        "summaries".into()
    }
    pub fn winners_path() -> String {
        "nyccwinners/nyc_winners.json".into()
    }

    pub fn data_dir() -> PathBuf {
        PathBuf::from("data")
    }
}
