// Re-export modules
pub mod assembler;
pub mod config;
pub mod crawlers;
pub mod delivery;
pub mod error;
pub mod layout;
pub mod locator;
pub mod query;
pub mod results;
pub mod server;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use error::ScrapeError;
pub use query::{QueryError, SearchQuery, SearchRequest};
pub use results::ProductRecord;

use config::ScraperConfig;
use layout::{Layout, Timeouts};
use session::WebDriverSession;

/// Records produced by one search, with the listing URL they came from
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub search_url: String,
    pub records: Vec<ProductRecord>,
}

/// Builder for one scraping run against the live site
pub struct ProductSearch {
    query: SearchQuery,
    config: ScraperConfig,
}

impl ProductSearch {
    /// Create a new search with default configuration
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query,
            config: ScraperConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, config::ConfigError> {
        let config = ScraperConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Set the number of listing pages to walk
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set the WebDriver server to drive
    pub fn with_webdriver_url(mut self, url: &str) -> Self {
        self.config.webdriver_url = url.to_string();
        self
    }

    pub fn listing_url(&self) -> String {
        self.query.listing_url()
    }

    /// Opens a browser session, runs the extraction and closes the session.
    ///
    /// The session is closed whether or not the extraction succeeded, and
    /// also when the returned future is dropped before completion.
    pub async fn run(self) -> Result<SearchOutcome, ScrapeError> {
        self.config.validate()?;
        let search_url = self.listing_url();

        let session = WebDriverSession::connect(&self.config).await?;
        let records = crawlers::scrape_and_close(
            session,
            search_url.clone(),
            self.config.max_pages,
            &Layout::FROM_JAPAN,
            &Timeouts::STANDARD,
        )
        .await?;

        Ok(SearchOutcome {
            search_url,
            records,
        })
    }
}
