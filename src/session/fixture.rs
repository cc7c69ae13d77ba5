//! In-memory [`Session`] over static HTML documents, for tests.

use crate::session::{Node, Session, SessionError};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Serves registered documents by URL; unknown URLs load an empty page.
///
/// Elements carrying a `data-fail` attribute reject every read, which stands
/// in for a card that detaches or errors mid-extraction.
pub struct FixtureSession {
    pages: HashMap<String, String>,
    state: Mutex<State>,
    closed: Arc<AtomicBool>,
}

#[derive(Default)]
struct State {
    source: String,
    visits: Vec<String>,
    clicks: usize,
}

/// Snapshot of an element taken at lookup time
#[derive(Debug, Clone)]
pub struct FixtureElement {
    attrs: HashMap<String, String>,
    text: String,
    inner_html: String,
    displayed: bool,
}

impl FixtureSession {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            state: Mutex::new(State::default()),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Registers `body` as the document served at `url`
    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// URLs loaded so far, through `goto` or a script click
    pub fn visits(&self) -> Vec<String> {
        self.state.lock().unwrap().visits.clone()
    }

    /// Set once the session has been closed; outlives the session itself
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    pub fn clicks(&self) -> usize {
        self.state.lock().unwrap().clicks
    }

    fn load(&self, url: &str) {
        let mut state = self.state.lock().unwrap();
        state.source = self.pages.get(url).cloned().unwrap_or_default();
        state.visits.push(url.to_string());
    }

    fn source(&self) -> String {
        self.state.lock().unwrap().source.clone()
    }
}

fn select(document: &Html, css: &str) -> Result<Vec<FixtureElement>, SessionError> {
    let selector =
        Selector::parse(css).map_err(|_| SessionError::Rejected(format!("invalid selector `{css}`")))?;
    Ok(document.select(&selector).map(snapshot).collect())
}

fn snapshot(element: ElementRef<'_>) -> FixtureElement {
    let attrs = element
        .value()
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let displayed = std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .all(|e| !is_hidden(&e));

    FixtureElement {
        attrs,
        text: element.text().collect(),
        inner_html: element.inner_html(),
        displayed,
    }
}

fn is_hidden(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    if value.attr("hidden").is_some() {
        return true;
    }
    value
        .attr("style")
        .map(|s| s.replace(' ', "").contains("display:none"))
        .unwrap_or(false)
}

impl FixtureElement {
    fn check(&self) -> Result<(), SessionError> {
        if self.attrs.contains_key("data-fail") {
            return Err(SessionError::Rejected("stale element reference".to_string()));
        }
        Ok(())
    }
}

impl Node for FixtureElement {
    async fn attr(&self, name: &str) -> Result<Option<String>, SessionError> {
        self.check()?;
        Ok(self.attrs.get(name).cloned())
    }

    async fn prop(&self, name: &str) -> Result<Option<String>, SessionError> {
        self.check()?;
        Ok(self.attrs.get(name).cloned())
    }

    async fn text(&self) -> Result<String, SessionError> {
        self.check()?;
        Ok(self.text.clone())
    }

    async fn is_displayed(&self) -> Result<bool, SessionError> {
        self.check()?;
        Ok(self.displayed)
    }

    async fn find_all(&self, css: &str) -> Result<Vec<FixtureElement>, SessionError> {
        self.check()?;
        select(&Html::parse_fragment(&self.inner_html), css)
    }
}

impl Session for FixtureSession {
    type Element = FixtureElement;

    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        self.load(url);
        Ok(())
    }

    async fn title(&self) -> Result<String, SessionError> {
        let document = Html::parse_document(&self.source());
        let title = select(&document, "title")?
            .first()
            .map(|t| t.text.trim().to_string())
            .unwrap_or_default();
        Ok(title)
    }

    async fn find_all(&self, css: &str) -> Result<Vec<FixtureElement>, SessionError> {
        select(&Html::parse_document(&self.source()), css)
    }

    async fn wait_for(&self, css: &str, _timeout: Duration) -> Result<bool, SessionError> {
        let found = select(&Html::parse_document(&self.source()), css)?;
        Ok(!found.is_empty())
    }

    async fn script_click(&self, element: &FixtureElement) -> Result<(), SessionError> {
        element.check()?;
        self.state.lock().unwrap().clicks += 1;
        if let Some(href) = element.attrs.get("href") {
            self.load(href);
        }
        Ok(())
    }

    async fn close(self) -> Result<(), SessionError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Class list of one search-results card
pub const CARD_CLASS: &str =
    "relative item-box flex items-start lg:items-center justify-center mb-4 w-2/5 lg:w-full";

/// One search-results card linking to `href`, with an optional thumbnail
pub fn grid_card(href: &str, img: Option<&str>) -> String {
    let img = img
        .map(|src| format!(r#"<img src="{src}">"#))
        .unwrap_or_default();
    format!(r#"<div class="{CARD_CLASS}"><a href="{href}">{img}</a></div>"#)
}

/// Search-results page holding `cards`, with a next-page link when `next` is set
pub fn grid_page(cards: &[String], next: Option<&str>) -> String {
    let next = next
        .map(|href| format!(r#"<a class="next-link" href="{href}">Next</a>"#))
        .unwrap_or_default();
    format!("<html><body>{}{}</body></html>", cards.concat(), next)
}

/// Product page shaped like the site's detail layout
pub fn product_page(
    title: &str,
    heading: Option<&str>,
    price: Option<&str>,
    seller: Option<(&str, &str)>,
) -> String {
    let heading = heading
        .map(|h| format!("<h1>{h}</h1>"))
        .unwrap_or_default();
    let price = price
        .map(|p| {
            format!(
                r#"<span class="text-2xl lg:text-4xl text-danger font-semibold break-words">{p}</span>"#
            )
        })
        .unwrap_or_default();
    // An empty href leaves the attribute out
    let seller = seller
        .map(|(text, href)| match href {
            "" => format!("<div><a>{text}</a></div>"),
            href => format!(r#"<div><a href="{href}">{text}</a></div>"#),
        })
        .unwrap_or_default();

    format!(
        r#"<html><head><title>{title}</title></head><body>{heading}
<div id="shopping"><div><div class="vx-col w-full mb-4"><div>
<div class="vx-card__collapsible-content vs-con-loading__container"><div>
  <div class="gallery"></div>
  <div>
    <div class="vx-col w-full lg:w-1/2 lg:pl-6">
      <div class="row">Condition</div>
      <div class="row">Shipping</div>
      <div class="row">
        <div class="vx-col w-1/5 lg:w-1/4">Price</div>
        <div class="vx-col w-3/5 lg:w-3/4"><div>tax incl.</div><div>{price}</div></div>
      </div>
      <div class="row">
        <div class="vx-col w-1/5 lg:w-1/4">Seller</div>
        <div class="vx-col w-3/5 lg:w-3/4">{seller}</div>
      </div>
    </div>
  </div>
</div></div></div></div></div></div>
</body></html>"#
    )
}
