use crate::results::{Listing, ProductDetails, ProductRecord};

/// Joins grid entries with their scraped details into records.
///
/// All parallel sequences are cut to the shortest one before zipping, so a
/// record is never built from fields at different positions. `details` must
/// be in the same order as `listing.product_links`.
pub fn assemble(listing: Listing, details: Vec<ProductDetails>) -> Vec<ProductRecord> {
    let mut names = Vec::with_capacity(details.len());
    let mut prices = Vec::with_capacity(details.len());
    let mut sellers = Vec::with_capacity(details.len());
    for d in details {
        let (name, price, seller) = d.into_fields();
        names.push(name);
        prices.push(price);
        sellers.push(seller);
    }
    let Listing {
        product_links: links,
        image_urls: images,
    } = listing;

    let lengths = [
        names.len(),
        prices.len(),
        links.len(),
        sellers.len(),
        images.len(),
    ];
    let n = lengths.iter().copied().min().unwrap_or(0);
    let longest = lengths.iter().copied().max().unwrap_or(0);
    if longest > n {
        ::log::warn!(
            "Truncating to {} records; lengths (names, prices, links, sellers, images) = {:?}",
            n,
            lengths
        );
    }

    names
        .into_iter()
        .zip(prices)
        .zip(links)
        .zip(sellers)
        .zip(images)
        .take(n)
        .map(|((((name, price), link), seller), image_url)| ProductRecord {
            name,
            price,
            link,
            seller,
            image_url,
        })
        .collect()
}
