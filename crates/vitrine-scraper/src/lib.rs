pub mod cache;
pub mod clean;
pub mod client;
pub mod error;
pub mod extract;
pub mod listing;
pub mod sitemap;
pub mod walk;

pub use cache::FetchCache;
pub use clean::{clean_description, clean_url, ensure_https};
pub use client::PageClient;
pub use error::ScraperError;
pub use extract::{extract_products, parse_embedded_payload};
pub use listing::{extract_listing, ListingPage};
pub use sitemap::fetch_category_sitemap;
pub use walk::{scrape_detail_page, walk_category};
