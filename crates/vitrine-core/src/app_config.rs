use std::path::PathBuf;

/// Runtime configuration for a crawl, loaded from environment variables.
///
/// Every knob has a default so a bare `vitrine crawl` works from a checkout
/// with only `url_category.txt` present.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the seed listing-URL file (newline/whitespace separated).
    pub seeds_path: PathBuf,
    /// Directory the per-category JSON files and `category.json` land in.
    pub output_dir: PathBuf,
    /// Fixed browser `User-Agent` sent with every request.
    pub user_agent: String,
    /// Per-request timeout for page fetches.
    pub request_timeout_secs: u64,
    /// Upper bound on in-flight detail-page fetches.
    pub max_concurrent_fetches: usize,
    /// Courtesy delay between launching successive detail fetches. `0`
    /// disables the delay; non-zero values are jittered.
    pub inter_request_delay_ms: u64,
    /// Whether empty extraction results (failed fetch, missing payload) are
    /// stored in the dedup cache. Matches the reference behavior when `true`;
    /// `false` lets a later request within the run retry the page.
    pub cache_negative_results: bool,
    /// URL of the gzip-compressed category sitemap.
    pub sitemap_url: String,
    pub log_level: String,
}
