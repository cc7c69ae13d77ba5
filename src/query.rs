use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SEARCH_BASE: &str = "https://www.fromjapan.co.jp/japan/en/rakuten/search";

/// Minimum price applied to seller searches, in yen
const SELLER_PRICE_MIN: u32 = 50_000;

/// Everything but unreserved characters and `/` is escaped
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Invalid combination of search inputs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Please use only one search method at a time.")]
    MultipleModes,

    #[error("Please enter a search term or select a seller.")]
    NoMode,
}

/// Search inputs as submitted by a caller; blank fields count as absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search: Option<String>,

    #[serde(default)]
    pub seller: Option<String>,

    #[serde(default, rename = "sellerSearch")]
    pub seller_search: Option<String>,
}

/// One validated search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Free-text product search
    Term(String),
    /// Products of one seller, by seller id
    Seller(String),
    /// Free-text search aimed at a seller's name
    SellerSearch(String),
}

impl SearchRequest {
    /// Picks the single search mode the request uses
    pub fn into_query(self) -> Result<SearchQuery, QueryError> {
        let modes = [
            non_blank(self.search).map(SearchQuery::Term),
            non_blank(self.seller).map(SearchQuery::Seller),
            non_blank(self.seller_search).map(SearchQuery::SellerSearch),
        ];

        let mut present = modes.into_iter().flatten();
        let query = present.next().ok_or(QueryError::NoMode)?;
        if present.next().is_some() {
            return Err(QueryError::MultipleModes);
        }
        Ok(query)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SearchQuery {
    /// First listing page for this search
    pub fn listing_url(&self) -> String {
        match self {
            SearchQuery::Term(term) => format!("{SEARCH_BASE}/{}/-/", escape(term)),
            SearchQuery::Seller(seller) => format!(
                "{SEARCH_BASE}/-/-/?seller={}&price_min={SELLER_PRICE_MIN}",
                escape(seller)
            ),
            SearchQuery::SellerSearch(name) => format!(
                "{SEARCH_BASE}/{}/-/?price_min={SELLER_PRICE_MIN}",
                escape(name)
            ),
        }
    }
}

fn escape(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ESCAPE).to_string()
}
