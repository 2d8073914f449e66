//! Product-link and next-page extraction from category listing pages.
//!
//! The HTML contract is fixed by the upstream site: product links live in
//! `div.product-thumbnail` containers as `a.product-thumbnail__link[href]`,
//! and the pagination "next" control is `a.arrow-button--right[href]`.

use scraper::{Html, Selector};

/// URLs extracted from one fetched listing page. The page body itself is not
/// retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Product detail URLs in document order, resolved to absolute form.
    pub detail_urls: Vec<String>,
    /// Absolute URL of the next listing page, or `None` on the last page.
    pub next_page_url: Option<String>,
}

/// Extracts detail-page links and the next-page link from listing HTML.
///
/// Relative hrefs are resolved against `page_url`; hrefs that cannot be
/// resolved (and a `page_url` that cannot be parsed at all) are skipped
/// rather than failing the page.
#[must_use]
pub fn extract_listing(html: &str, page_url: &str) -> ListingPage {
    let thumbnail = Selector::parse("div.product-thumbnail").expect("valid selector");
    let link = Selector::parse("a.product-thumbnail__link").expect("valid selector");
    let next = Selector::parse("a.arrow-button--right").expect("valid selector");

    let document = Html::parse_document(html);
    let base = reqwest::Url::parse(page_url).ok();

    let mut detail_urls = Vec::new();
    for container in document.select(&thumbnail) {
        for anchor in container.select(&link) {
            if let Some(href) = anchor.value().attr("href") {
                if let Some(resolved) = resolve_href(base.as_ref(), href) {
                    detail_urls.push(resolved);
                }
            }
        }
    }

    let next_page_url = document
        .select(&next)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| resolve_href(base.as_ref(), href));

    ListingPage {
        detail_urls,
        next_page_url,
    }
}

/// Resolves `href` against the listing page's URL. Absolute hrefs pass
/// through as-is.
fn resolve_href(base: Option<&reqwest::Url>, href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_owned());
    }
    base.and_then(|b| b.join(href).ok())
        .map(|url| url.to_string())
}
