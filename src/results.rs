use serde::{Deserialize, Serialize};

pub const NO_NAME: &str = "No name";
pub const NO_PRICE: &str = "No price";
pub const NO_SELLER: &str = "No seller";
pub const NO_IMAGE_URL: &str = "No image URL";

/// One scraped product, as handed to the downstream sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Product Name")]
    pub name: String,

    #[serde(rename = "Price")]
    pub price: String,

    /// Detail page URL
    #[serde(rename = "Link")]
    pub link: String,

    #[serde(rename = "Seller")]
    pub seller: String,

    /// Thumbnail URL, or [`NO_IMAGE_URL`]
    #[serde(rename = "Image URL")]
    pub image_url: String,
}

/// What the listing scraper collected across all pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Unique product links in first-seen order
    pub product_links: Vec<String>,
    /// Thumbnail for each entry of `product_links`, at the same index
    pub image_urls: Vec<String>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.product_links.is_empty()
    }

    pub fn len(&self) -> usize {
        self.product_links.len()
    }
}

/// Fields read from one product page; `None` means the field was not found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDetails {
    pub name: Option<String>,
    pub price: Option<String>,
    pub seller: Option<String>,
}

impl ProductDetails {
    /// Resolves each field, substituting its placeholder when absent
    pub fn into_fields(self) -> (String, String, String) {
        (
            self.name.unwrap_or_else(|| NO_NAME.to_string()),
            self.price.unwrap_or_else(|| NO_PRICE.to_string()),
            self.seller.unwrap_or_else(|| NO_SELLER.to_string()),
        )
    }
}
