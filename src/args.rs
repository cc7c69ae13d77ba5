use clap::Parser;
use fromjapan_scraper::SearchRequest;
use fromjapan_scraper::config::ScraperConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fromjapan-scraper")]
#[command(about = "Scrapes FromJapan Rakuten search results through a WebDriver-controlled browser")]
#[command(version)]
pub struct Args {
    /// Free-text product search term
    #[arg(long)]
    pub search: Option<String>,

    /// Seller id to list products for
    #[arg(long)]
    pub seller: Option<String>,

    /// Free-text search for a seller's products
    #[arg(long)]
    pub seller_search: Option<String>,

    /// Number of listing pages to walk
    #[arg(short = 'p', long)]
    pub max_pages: Option<usize>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Endpoint that receives the scraped records
    #[arg(long)]
    pub sink_url: Option<String>,

    /// Run Chrome without a window
    #[arg(long)]
    pub headless: bool,

    /// Serve the HTTP search API instead of running a single search
    #[arg(long)]
    pub serve: bool,

    /// Address for the HTTP API (with --serve)
    #[arg(long)]
    pub bind: Option<String>,
}

impl Args {
    /// The search inputs given on the command line
    pub fn search_request(&self) -> SearchRequest {
        SearchRequest {
            search: self.search.clone(),
            seller: self.seller.clone(),
            seller_search: self.seller_search.clone(),
        }
    }

    /// Applies command-line overrides on top of file and environment settings
    pub fn apply_to(&self, config: &mut ScraperConfig) {
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if let Some(url) = &self.sink_url {
            config.sink_url = Some(url.clone());
        }
        if let Some(bind) = &self.bind {
            config.bind_address = bind.clone();
        }
        if self.headless {
            config.headless = true;
        }
    }
}
