use clap::Parser;
use fromjapan_scraper::config::ScraperConfig;
use fromjapan_scraper::delivery::SinkClient;
use fromjapan_scraper::{ProductSearch, ScrapeError, server};
use std::process::ExitCode;
use std::time::Duration;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match ScraperConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ScraperConfig::default(),
    };
    config.apply_env();
    args.apply_to(&mut config);

    if args.serve {
        println!("Note: searches require a WebDriver server (e.g., ChromeDriver).");
        println!("Set WEBDRIVER_URL if not using the default {}", config.webdriver_url);
        return match server::serve(config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                ::log::error!("Server failed: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let query = match args.search_request().into_query() {
        Ok(query) => query,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    ::log::info!("Starting search: {:?}", query);

    let start_time = std::time::Instant::now();
    let sink_url = config.sink_url.clone();
    let sink_timeout = Duration::from_secs(config.sink_timeout_secs);

    let outcome = match ProductSearch::new(query).with_config(config).run().await {
        Ok(outcome) => outcome,
        Err(ScrapeError::NoProducts) => {
            eprintln!("No products found.");
            return ExitCode::from(3);
        }
        Err(e) => {
            ::log::error!("Search failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    ::log::info!(
        "Scraped {} products from {} in {:.2} seconds",
        outcome.records.len(),
        outcome.search_url,
        start_time.elapsed().as_secs_f64()
    );

    match serde_json::to_string_pretty(&outcome.records) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            ::log::error!("Failed to encode records: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if let Some(url) = sink_url {
        let delivered = match SinkClient::new(&url, sink_timeout) {
            Ok(sink) => sink.deliver(&outcome.records).await,
            Err(e) => Err(e),
        };
        if let Err(e) = delivered {
            ::log::error!("Delivery to {} failed: {}", url, e);
            return ExitCode::FAILURE;
        }
        ::log::info!("Delivered {} records to {}", outcome.records.len(), url);
    }

    ExitCode::SUCCESS
}
