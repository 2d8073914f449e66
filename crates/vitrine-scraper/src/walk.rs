//! Category pagination walk and the per-detail-page pipeline.

use vitrine_core::ProductRecord;

use crate::cache::FetchCache;
use crate::clean::clean_url;
use crate::client::PageClient;
use crate::error::ScraperError;
use crate::extract::{extract_products, parse_embedded_payload};
use crate::listing::extract_listing;

/// Walks a category's listing pages from `seed_url`, following the next-page
/// control until the last page, and returns every product detail URL found,
/// in discovery order.
///
/// The walk is strictly sequential; each page's URL comes from the previous
/// page's response. There is no page cap and no cycle detection; a site bug
/// emitting a self-referential next link would loop.
///
/// # Errors
///
/// A listing-page fetch failure aborts the walk and discards the URLs
/// accumulated so far. Callers decide whether that kills the whole run or
/// just this seed.
pub async fn walk_category(
    client: &PageClient,
    seed_url: &str,
) -> Result<Vec<String>, ScraperError> {
    let mut detail_urls = Vec::new();
    let mut current = seed_url.to_owned();

    loop {
        tracing::info!(url = %current, "fetching listing page");
        let html = client.fetch_html(&current).await?;
        let page = extract_listing(&html, &current);
        tracing::debug!(
            url = %current,
            products = page.detail_urls.len(),
            has_next = page.next_page_url.is_some(),
            "listing page extracted"
        );
        detail_urls.extend(page.detail_urls);

        match page.next_page_url {
            Some(next) => current = next,
            None => break,
        }
    }

    Ok(detail_urls)
}

/// Fetches one detail page and extracts its product records, through the
/// dedup cache.
///
/// Every failure mode degrades to an empty result: fetch errors and missing
/// or malformed payloads are logged and swallowed so one bad page never
/// cancels its siblings. Records carry the cleaned URL.
pub async fn scrape_detail_page(
    client: &PageClient,
    cache: &FetchCache,
    url: &str,
) -> Vec<ProductRecord> {
    cache
        .get_or_fetch(url, || async {
            let html = match client.fetch_html(url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::error!(url, error = %e, "failed to fetch detail page");
                    return vec![];
                }
            };

            let Some(payload) = parse_embedded_payload(&html) else {
                tracing::warn!(url, "product data not found");
                return vec![];
            };

            let records = extract_products(&payload, &clean_url(url));
            if records.is_empty() {
                tracing::warn!(url, "payload matched no known product shape");
            }
            records
        })
        .await
}
