use crate::layout::{Layout, SelectorRule, Timeouts};
use crate::locator::{self, LocateMode};
use crate::results::ProductDetails;
use crate::session::{Node, Session, url_of};
use crate::utils::strip_suffixes;

/// Reads name, price and seller from one product page.
///
/// Never fails: each field is looked up independently and comes back as
/// `None` when it cannot be read.
pub async fn scrape_details<S: Session>(
    session: &mut S,
    product_url: &str,
    layout: &Layout,
    timeouts: &Timeouts,
) -> ProductDetails {
    if let Err(e) = session.goto(product_url).await {
        ::log::error!("Error loading product page {}: {}", product_url, e);
        return ProductDetails::default();
    }

    let ready = SelectorRule::any_of_rules(&[&layout.price, &layout.seller]);
    match session.wait_for(&ready, timeouts.render).await {
        Ok(true) => {}
        Ok(false) => ::log::warn!(
            "Price/seller block not rendered on {} after {:?}, reading what is there",
            product_url,
            timeouts.render
        ),
        Err(e) => ::log::warn!("Wait failed on {}: {}", product_url, e),
    }

    let session = &*session;
    let details = ProductDetails {
        name: read_name(session, layout).await,
        price: read_price(session, layout).await,
        seller: read_seller(session, layout).await,
    };
    ::log::debug!("Details for {}: {:?}", product_url, details);
    details
}

/// Document title without the site suffix, else the first heading
async fn read_name<S: Session>(session: &S, layout: &Layout) -> Option<String> {
    if let Ok(title) = session.title().await {
        let name = strip_suffixes(&title, layout.title_suffixes);
        if !name.is_empty() {
            return Some(name);
        }
    }

    ::log::trace!("Title empty, falling back to heading");
    first_text(session, &layout.heading).await
}

async fn read_price<S: Session>(session: &S, layout: &Layout) -> Option<String> {
    first_text(session, &layout.price).await
}

/// Seller text, or the seller link when the element has no text
async fn read_seller<S: Session>(session: &S, layout: &Layout) -> Option<String> {
    let element = first(session, &layout.seller).await?;
    if let Some(text) = text_of(&element).await {
        return Some(text);
    }
    url_of(&element, "href").await.ok().flatten()
}

async fn first<S: Session>(session: &S, rule: &SelectorRule) -> Option<S::Element> {
    locator::locate(session, rule, LocateMode::All)
        .await
        .into_iter()
        .next()
}

async fn first_text<S: Session>(session: &S, rule: &SelectorRule) -> Option<String> {
    let element = first(session, rule).await?;
    text_of(&element).await
}

async fn text_of<N: Node>(element: &N) -> Option<String> {
    let text = element.text().await.ok()?.trim().to_string();
    (!text.is_empty()).then_some(text)
}
