use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Problems loading or validating a [`ScraperConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_pages must be at least 1")]
    InvalidMaxPages,

    #[error("invalid sink_url `{url}`: {source}")]
    InvalidSinkUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Runtime settings for the scraper and its HTTP surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Number of listing pages to walk
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Run Chrome without a window
    #[serde(default)]
    pub headless: bool,

    /// Chrome window size as `width,height`
    #[serde(default = "default_window_size")]
    pub window_size: String,

    /// Endpoint that receives the scraped records; delivery is skipped when unset
    #[serde(default)]
    pub sink_url: Option<String>,

    /// Seconds to wait for the sink to answer
    #[serde(default = "default_sink_timeout_secs")]
    pub sink_timeout_secs: u64,

    /// Address the HTTP API listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_max_pages() -> usize {
    1
}

fn default_window_size() -> String {
    "1920,1080".to_string()
}

fn default_sink_timeout_secs() -> u64 {
    30
}

fn default_bind_address() -> String {
    "127.0.0.1:5000".to_string()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            max_pages: default_max_pages(),
            headless: false,
            window_size: default_window_size(),
            sink_url: None,
            sink_timeout_secs: default_sink_timeout_secs(),
            bind_address: default_bind_address(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Overrides fields from `WEBDRIVER_URL`, `SINK_URL` and `BIND_ADDRESS`
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        let set = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = set("WEBDRIVER_URL") {
            self.webdriver_url = url;
        }
        if let Some(url) = set("SINK_URL") {
            self.sink_url = Some(url);
        }
        if let Some(addr) = set("BIND_ADDRESS") {
            self.bind_address = addr;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pages == 0 {
            return Err(ConfigError::InvalidMaxPages);
        }
        if let Some(url) = &self.sink_url {
            Url::parse(url).map_err(|source| ConfigError::InvalidSinkUrl {
                url: url.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
