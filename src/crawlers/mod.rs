pub mod detail;
pub mod listing;


use crate::assembler;
use crate::error::ScrapeError;
use crate::layout::{Layout, Timeouts};
use crate::results::ProductRecord;
use crate::session::Session;

pub use detail::scrape_details;
pub use listing::scrape_listing;

/// Runs the whole extraction on an already open session.
///
/// Walks the listing at `url`, visits every collected product page in order
/// and assembles the records. Returns [`ScrapeError::NoProducts`] when the
/// listing produced no links.
pub async fn scrape_products<S: Session>(
    session: &mut S,
    url: &str,
    max_pages: usize,
    layout: &Layout,
    timeouts: &Timeouts,
) -> Result<Vec<ProductRecord>, ScrapeError> {
    ::log::info!("Scraping URL: {}", url);

    let listing = scrape_listing(session, url, max_pages, layout, timeouts).await;
    if listing.is_empty() {
        ::log::info!("No product links collected from {}", url);
        return Err(ScrapeError::NoProducts);
    }
    ::log::info!("Collected {} product links", listing.len());

    let mut details = Vec::with_capacity(listing.len());
    for (i, link) in listing.product_links.iter().enumerate() {
        ::log::debug!("Product {}/{}: {}", i + 1, listing.len(), link);
        details.push(scrape_details(session, link, layout, timeouts).await);
    }

    let records = assembler::assemble(listing, details);
    ::log::info!("Assembled {} records", records.len());
    Ok(records)
}

/// Runs [`scrape_products`] on its own task, then closes the session.
///
/// The task owns the session, so `close` still runs when the caller stops
/// awaiting (an HTTP client disconnecting, say). If the scrape itself panics
/// the close is skipped and the session is released when the WebDriver client
/// is dropped; the panic comes back as [`ScrapeError::Task`].
pub async fn scrape_and_close<S: Session + 'static>(
    mut session: S,
    url: String,
    max_pages: usize,
    layout: &'static Layout,
    timeouts: &'static Timeouts,
) -> Result<Vec<ProductRecord>, ScrapeError> {
    let task = tokio::spawn(async move {
        let result = scrape_products(&mut session, &url, max_pages, layout, timeouts).await;
        if let Err(e) = session.close().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }
        result
    });
    task.await?
}
