use std::time::Duration;

/// An ordered list of candidate CSS selectors for one logical target.
///
/// Candidates are tried in order; which one wins depends on the
/// [`LocateMode`](crate::locator::LocateMode) used to resolve the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorRule {
    /// Short label used in log output
    pub name: &'static str,
    pub candidates: &'static [&'static str],
}

impl SelectorRule {
    pub const fn new(name: &'static str, candidates: &'static [&'static str]) -> Self {
        Self { name, candidates }
    }

    /// All candidates as a single selector group that matches any of them
    pub fn any_of(&self) -> String {
        self.candidates.join(", ")
    }

    /// Selector group matching any candidate of any of the given rules
    pub fn any_of_rules(rules: &[&SelectorRule]) -> String {
        rules
            .iter()
            .flat_map(|r| r.candidates.iter().copied())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Every selector the scrapers rely on for one page layout family
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    /// Product links in the search-results grid
    pub grid_link: SelectorRule,
    /// Thumbnails in the grid, positionally paired with `grid_link`
    pub grid_image: SelectorRule,
    /// Image nested inside a single grid link
    pub card_image: SelectorRule,
    /// "Next page" control, in priority order
    pub next_page: SelectorRule,
    pub price: SelectorRule,
    pub seller: SelectorRule,
    /// Heading used when the document title carries no name
    pub heading: SelectorRule,
    /// Site suffixes stripped from document titles
    pub title_suffixes: &'static [&'static str],
}

const GRID_LINK: &str = r"div.relative.item-box.flex.items-start.lg\:items-center.justify-center.mb-4.w-2\/5.lg\:w-full > a";

const GRID_IMAGE: &str = r"div.relative.item-box.flex.items-start.lg\:items-center.justify-center.mb-4.w-2\/5.lg\:w-full > a > img";

const PRICE: &str = concat!(
    r"#shopping > div > div.vx-col.w-full.mb-4 > div > ",
    r"div.vx-card__collapsible-content.vs-con-loading__container > div > div:nth-child(2) > ",
    r"div.vx-col.w-full.lg\:w-1\/2.lg\:pl-6 > div:nth-child(3) > ",
    r"div.vx-col.w-3\/5.lg\:w-3\/4 > div:nth-child(2) > ",
    r"span.text-2xl.lg\:text-4xl.text-danger.font-semibold.break-words",
);

const SELLER: &str = concat!(
    r"#shopping > div > div.vx-col.w-full.mb-4 > div > ",
    r"div.vx-card__collapsible-content.vs-con-loading__container > div > div:nth-child(2) > ",
    r"div.vx-col.w-full.lg\:w-1\/2.lg\:pl-6 > div:nth-child(4) > ",
    r"div.vx-col.w-3\/5.lg\:w-3\/4 > div > a",
);

impl Layout {
    /// FromJapan's Rakuten search and product pages
    pub const FROM_JAPAN: Layout = Layout {
        grid_link: SelectorRule::new("grid link", &[GRID_LINK]),
        grid_image: SelectorRule::new("grid image", &[GRID_IMAGE]),
        card_image: SelectorRule::new("card image", &["img"]),
        next_page: SelectorRule::new(
            "next page",
            &[
                "a.next-link",
                "a[aria-label='Next']",
                "button[aria-label='Next']",
                "a.pagination-next",
            ],
        ),
        price: SelectorRule::new("price", &[PRICE]),
        seller: SelectorRule::new("seller", &[SELLER]),
        heading: SelectorRule::new("heading", &["h1"]),
        title_suffixes: &[" | FROM JAPAN", " | FromJapan", " | FROMJAPAN"],
    };
}

/// Bounds on every wait a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// How long to wait for the grid or the detail block to render
    pub render: Duration,
    /// Fixed pause after triggering the next-page control
    pub settle: Duration,
}

impl Timeouts {
    pub const STANDARD: Timeouts = Timeouts {
        render: Duration::from_secs(20),
        settle: Duration::from_secs(2),
    };
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::STANDARD
    }
}
