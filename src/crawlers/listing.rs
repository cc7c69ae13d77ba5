use crate::layout::{Layout, Timeouts};
use crate::locator::{self, LocateMode};
use crate::results::{Listing, NO_IMAGE_URL};
use crate::session::{Node, Session, url_of};
use std::collections::HashSet;

/// Collects product links and thumbnails from a search-results grid.
///
/// Walks at most `max_pages` pages starting at `url`. Pagination stops early
/// when the grid does not render within `timeouts.render` or when no next-page
/// control is found; whatever was collected up to that point is returned.
pub async fn scrape_listing<S: Session>(
    session: &mut S,
    url: &str,
    max_pages: usize,
    layout: &Layout,
    timeouts: &Timeouts,
) -> Listing {
    let mut listing = Listing::default();
    let mut seen = HashSet::new();

    if let Err(e) = session.goto(url).await {
        ::log::error!("Failed to load listing {}: {}", url, e);
        return listing;
    }

    for page_num in 1..=max_pages {
        ::log::info!("Scraping grid page {}", page_num);

        match session
            .wait_for(&layout.grid_link.any_of(), timeouts.render)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                ::log::warn!(
                    "Grid not rendered on page {} after {:?}, stopping",
                    page_num,
                    timeouts.render
                );
                break;
            }
            Err(e) => {
                ::log::warn!("Grid wait failed on page {}: {}", page_num, e);
                break;
            }
        }

        let before = listing.len();
        extract_page(&*session, layout, &mut seen, &mut listing).await;
        ::log::info!(
            "Page {} added {} links ({} total)",
            page_num,
            listing.len() - before,
            listing.len()
        );

        if page_num == max_pages {
            break;
        }
        if !advance(&*session, layout, timeouts).await {
            break;
        }
    }

    listing
}

/// Appends every not-yet-seen card on the current page to `listing`
async fn extract_page<S: Session>(
    session: &S,
    layout: &Layout,
    seen: &mut HashSet<String>,
    listing: &mut Listing,
) {
    let links = locator::locate(session, &layout.grid_link, LocateMode::All).await;
    let images = locator::locate(session, &layout.grid_image, LocateMode::All).await;
    ::log::debug!("Found {} grid links and {} grid images", links.len(), images.len());

    for (idx, link) in links.iter().enumerate() {
        let href = match url_of(link, "href").await {
            Ok(Some(href)) => href,
            Ok(None) => continue,
            Err(e) => {
                ::log::warn!("Skipping card {}: {}", idx, e);
                continue;
            }
        };
        if !seen.insert(href.clone()) {
            ::log::trace!("Skipping duplicate link {}", href);
            continue;
        }

        let image = resolve_image(&images, idx, link, layout).await;
        listing.product_links.push(href);
        listing.image_urls.push(image);
    }
}

/// Thumbnail for the card at `idx`: the grid image at the same position,
/// then an image nested in the link itself, then the placeholder
async fn resolve_image<N: Node>(images: &[N], idx: usize, link: &N, layout: &Layout) -> String {
    if let Some(image) = images.get(idx) {
        if let Ok(Some(src)) = url_of(image, "src").await {
            return src;
        }
    }

    for nested in locator::locate_within(link, &layout.card_image).await {
        if let Ok(Some(src)) = url_of(&nested, "src").await {
            return src;
        }
    }

    NO_IMAGE_URL.to_string()
}

/// Triggers the next-page control; returns false when pagination is over
async fn advance<S: Session>(session: &S, layout: &Layout, timeouts: &Timeouts) -> bool {
    let Some(next) = locator::locate(session, &layout.next_page, LocateMode::First)
        .await
        .into_iter()
        .next()
    else {
        ::log::info!("No next button found, stopping pagination");
        return false;
    };

    if let Err(e) = session.script_click(&next).await {
        ::log::warn!("Pagination failed: {}", e);
        return false;
    }
    tokio::time::sleep(timeouts.settle).await;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fixture::{CARD_CLASS, FixtureSession, grid_card as card, grid_page as grid};
    use std::time::Duration;

    const INSTANT: Timeouts = Timeouts {
        render: Duration::ZERO,
        settle: Duration::ZERO,
    };

    async fn run(session: &mut FixtureSession, max_pages: usize) -> Listing {
        scrape_listing(
            session,
            "https://shop.test/search/1",
            max_pages,
            &Layout::FROM_JAPAN,
            &INSTANT,
        )
        .await
    }

    #[tokio::test]
    async fn test_extracts_links_and_images_in_order() {
        let page = grid(
            &[
                card("https://shop.test/item/a", Some("https://img.test/a.jpg")),
                card("https://shop.test/item/b", Some("https://img.test/b.jpg")),
            ],
            None,
        );
        let mut session = FixtureSession::new().with_page("https://shop.test/search/1", &page);

        let listing = run(&mut session, 1).await;
        assert_eq!(
            listing.product_links,
            vec!["https://shop.test/item/a", "https://shop.test/item/b"]
        );
        assert_eq!(
            listing.image_urls,
            vec!["https://img.test/a.jpg", "https://img.test/b.jpg"]
        );
    }

    #[tokio::test]
    async fn test_duplicate_links_keep_first_occurrence() {
        let page = grid(
            &[
                card("https://shop.test/item/a", Some("https://img.test/a.jpg")),
                card("https://shop.test/item/b", Some("https://img.test/b.jpg")),
                card("https://shop.test/item/a", Some("https://img.test/a2.jpg")),
                card("https://shop.test/item/c", Some("https://img.test/c.jpg")),
                card("https://shop.test/item/b", Some("https://img.test/b2.jpg")),
            ],
            None,
        );
        let mut session = FixtureSession::new().with_page("https://shop.test/search/1", &page);

        let listing = run(&mut session, 1).await;
        assert_eq!(
            listing.product_links,
            vec![
                "https://shop.test/item/a",
                "https://shop.test/item/b",
                "https://shop.test/item/c"
            ]
        );
        assert_eq!(listing.image_urls[2], "https://img.test/c.jpg");
        assert_eq!(listing.product_links.len(), listing.image_urls.len());
    }

    #[tokio::test]
    async fn test_missing_image_uses_placeholder() {
        let page = grid(
            &[
                card("https://shop.test/item/a", None),
                card("https://shop.test/item/b", None),
            ],
            None,
        );
        let mut session = FixtureSession::new().with_page("https://shop.test/search/1", &page);

        let listing = run(&mut session, 1).await;
        assert_eq!(listing.image_urls, vec![NO_IMAGE_URL, NO_IMAGE_URL]);
    }

    #[tokio::test]
    async fn test_image_falls_back_to_nested_search() {
        // Thumbnail wrapped in a span: the grid image selector misses it
        let wrapped = format!(
            r#"<div class="{CARD_CLASS}"><a href="https://shop.test/item/a"><span><img src="https://img.test/a.jpg"></span></a></div>"#
        );
        let page = grid(
            &[wrapped, card("https://shop.test/item/b", None)],
            None,
        );
        let mut session = FixtureSession::new().with_page("https://shop.test/search/1", &page);

        let listing = run(&mut session, 1).await;
        assert_eq!(
            listing.image_urls,
            vec!["https://img.test/a.jpg", NO_IMAGE_URL]
        );
    }

    #[tokio::test]
    async fn test_sourceless_grid_image_falls_back_to_nested() {
        // The grid image at index 0 exists but carries no src
        let lazy = format!(
            r#"<div class="{CARD_CLASS}"><a href="https://shop.test/item/a"><img><span><img src="https://img.test/a.jpg"></span></a></div>"#
        );
        let page = grid(
            &[
                lazy,
                card("https://shop.test/item/b", Some("https://img.test/b.jpg")),
            ],
            None,
        );
        let mut session = FixtureSession::new().with_page("https://shop.test/search/1", &page);

        let listing = run(&mut session, 1).await;
        assert_eq!(
            listing.image_urls,
            vec!["https://img.test/a.jpg", "https://img.test/b.jpg"]
        );
    }

    #[tokio::test]
    async fn test_unrendered_grid_returns_empty() {
        let mut session = FixtureSession::new()
            .with_page("https://shop.test/search/1", "<html><body>Loading</body></html>");

        let listing = run(&mut session, 3).await;
        assert!(listing.product_links.is_empty());
        assert!(listing.image_urls.is_empty());
    }

    #[tokio::test]
    async fn test_failing_card_is_skipped() {
        let broken = format!(
            r#"<div class="{CARD_CLASS}"><a data-fail href="https://shop.test/item/x"></a></div>"#
        );
        let page = grid(
            &[
                card("https://shop.test/item/a", Some("https://img.test/a.jpg")),
                broken,
                card("https://shop.test/item/b", Some("https://img.test/b.jpg")),
            ],
            None,
        );
        let mut session = FixtureSession::new().with_page("https://shop.test/search/1", &page);

        let listing = run(&mut session, 1).await;
        assert_eq!(
            listing.product_links,
            vec!["https://shop.test/item/a", "https://shop.test/item/b"]
        );
        assert_eq!(listing.image_urls.len(), 2);
    }

    #[tokio::test]
    async fn test_follows_next_page_within_budget() {
        let page1 = grid(
            &[card("https://shop.test/item/a", None)],
            Some("https://shop.test/search/2"),
        );
        let page2 = grid(
            &[
                card("https://shop.test/item/a", None),
                card("https://shop.test/item/b", None),
            ],
            Some("https://shop.test/search/3"),
        );
        let page3 = grid(&[card("https://shop.test/item/c", None)], None);
        let mut session = FixtureSession::new()
            .with_page("https://shop.test/search/1", &page1)
            .with_page("https://shop.test/search/2", &page2)
            .with_page("https://shop.test/search/3", &page3);

        let listing = run(&mut session, 2).await;
        assert_eq!(
            listing.product_links,
            vec!["https://shop.test/item/a", "https://shop.test/item/b"]
        );
        assert_eq!(session.clicks(), 1);
    }

    #[tokio::test]
    async fn test_stops_without_next_control() {
        let page1 = grid(&[card("https://shop.test/item/a", None)], None);
        let mut session = FixtureSession::new().with_page("https://shop.test/search/1", &page1);

        let listing = run(&mut session, 5).await;
        assert_eq!(listing.product_links, vec!["https://shop.test/item/a"]);
        assert_eq!(session.clicks(), 0);
        assert_eq!(session.visits(), vec!["https://shop.test/search/1"]);
    }

    #[tokio::test]
    async fn test_timeout_on_later_page_keeps_earlier_results() {
        let page1 = grid(
            &[card("https://shop.test/item/a", None)],
            Some("https://shop.test/search/2"),
        );
        let mut session = FixtureSession::new()
            .with_page("https://shop.test/search/1", &page1)
            .with_page("https://shop.test/search/2", "<html><body></body></html>");

        let listing = run(&mut session, 3).await;
        assert_eq!(listing.product_links, vec!["https://shop.test/item/a"]);
        assert_eq!(session.clicks(), 1);
    }
}
