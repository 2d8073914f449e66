//! Command handlers: the category crawl and the sitemap refresh.
//!
//! Per-seed failures are logged and skipped rather than propagated so a
//! single dead category does not abort the full run. Within a seed, the
//! detail-page fan-out is bounded and failure-tolerant; only the listing
//! walk itself can fail a seed.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use futures::stream::{self, StreamExt};
use rand::Rng;

use vitrine_core::{AppConfig, ProductRecord};
use vitrine_scraper::{
    fetch_category_sitemap, scrape_detail_page, walk_category, FetchCache, PageClient,
};

/// Crawl every seed URL and persist one JSON collection per category.
///
/// # Errors
///
/// Returns an error when the seeds file cannot be read, is empty, or the
/// HTTP client cannot be built. Per-seed crawl failures are logged, not
/// propagated; the process exits successfully with partial data.
pub(crate) async fn run_crawl(
    config: &AppConfig,
    seeds_override: Option<&Path>,
) -> anyhow::Result<()> {
    let seeds_path = seeds_override.unwrap_or(&config.seeds_path);
    let seeds = load_seed_urls(seeds_path)?;
    if seeds.is_empty() {
        anyhow::bail!("no seed URLs found in {}", seeds_path.display());
    }

    let client = PageClient::new(config.request_timeout_secs, &config.user_agent)?;
    let cache = FetchCache::new(config.cache_negative_results);

    let mut failed_seeds = 0usize;
    for seed in &seeds {
        tracing::info!(seed, "processing category");
        match process_seed(&client, &cache, config, seed).await {
            Ok(persisted) => {
                tracing::info!(seed, records = persisted, "category persisted");
            }
            Err(e) => {
                failed_seeds += 1;
                tracing::error!(seed, error = %e, "category failed; continuing with remaining seeds");
            }
        }
    }

    if failed_seeds > 0 {
        tracing::warn!(
            failed_seeds,
            total_seeds = seeds.len(),
            "some categories failed during the crawl"
        );
    }
    tracing::info!(pages_cached = cache.len(), "crawl finished");
    Ok(())
}

/// Walk one category, scrape its detail pages concurrently, filter out
/// records missing required fields, and merge into the category's JSON file.
///
/// Returns the size of the on-disk collection after the merge.
async fn process_seed(
    client: &PageClient,
    cache: &FetchCache,
    config: &AppConfig,
    seed: &str,
) -> anyhow::Result<usize> {
    let detail_urls = walk_category(client, seed).await?;
    tracing::info!(seed, urls = detail_urls.len(), "category walk complete");

    let delay_ms = config.inter_request_delay_ms;
    let results: Vec<Vec<ProductRecord>> = stream::iter(&detail_urls)
        .map(|url| async move {
            if delay_ms > 0 {
                // Courtesy stagger, jittered so workers don't fire in lockstep.
                let jitter = rand::rng().random_range(0..=delay_ms);
                tokio::time::sleep(Duration::from_millis(jitter)).await;
            }
            scrape_detail_page(client, cache, url).await
        })
        .buffer_unordered(config.max_concurrent_fetches.max(1))
        .collect()
        .await;

    let records: Vec<ProductRecord> = results.into_iter().flatten().collect();
    let extracted = records.len();
    let valid: Vec<ProductRecord> = records
        .into_iter()
        .filter(ProductRecord::is_persistable)
        .collect();
    if valid.len() < extracted {
        tracing::warn!(
            seed,
            dropped = extracted - valid.len(),
            "dropped records missing a required id, name, brand, or price"
        );
    }

    let path = config.output_dir.join(output_file_name(seed));
    let persisted = vitrine_store::merge_and_save(&valid, &path)?;
    Ok(persisted)
}

/// Refresh `category.json` from the gzip-compressed category sitemap.
///
/// # Errors
///
/// Propagates fetch, decompression, parse, and persistence failures; unlike
/// the crawl there is no partial-output mode for a single-file refresh.
pub(crate) async fn run_categories(config: &AppConfig) -> anyhow::Result<()> {
    let client = PageClient::new(config.request_timeout_secs, &config.user_agent)?;
    let entries = fetch_category_sitemap(&client, &config.sitemap_url).await?;

    let path = config.output_dir.join("category.json");
    let persisted = vitrine_store::merge_and_save(&entries, &path)?;
    tracing::info!(path = %path.display(), records = persisted, "category index saved");
    Ok(())
}

/// Reads the seeds file: one listing URL per line, whitespace-separated
/// entries tolerated, blank lines skipped.
fn load_seed_urls(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seeds file {}", path.display()))?;
    Ok(content.split_whitespace().map(str::to_owned).collect())
}

/// Derives the per-category output file name from a seed URL: the last
/// path segment with `?` and `/` replaced by `_`, plus `.json`.
fn output_file_name(seed_url: &str) -> String {
    let last_segment = seed_url.rsplit('/').next().unwrap_or(seed_url);
    let mut name: String = last_segment
        .chars()
        .map(|c| if c == '?' || c == '/' { '_' } else { c })
        .collect();
    name.push_str(".json");
    name
}
