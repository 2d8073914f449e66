use crate::app_config::AppConfig;
use crate::ConfigError;

/// The `User-Agent` sent when none is configured. A fixed browser string;
/// the upstream site serves the product payload only to browser-like agents.
pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const DEFAULT_SITEMAP_URL: &str = "https://www.neimanmarcus.com/sitemap_category_1.xml.gz";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup, no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false/1/0, got \"{other}\""),
            }),
        }
    };

    let seeds_path = PathBuf::from(or_default("VITRINE_SEEDS_PATH", "./url_category.txt"));
    let output_dir = PathBuf::from(or_default("VITRINE_OUTPUT_DIR", "./data"));
    let user_agent = or_default("VITRINE_USER_AGENT", DEFAULT_USER_AGENT);
    let log_level = or_default("VITRINE_LOG_LEVEL", "info");
    let sitemap_url = or_default("VITRINE_SITEMAP_URL", DEFAULT_SITEMAP_URL);

    let request_timeout_secs = parse_u64("VITRINE_REQUEST_TIMEOUT_SECS", "10")?;
    let max_concurrent_fetches = parse_usize("VITRINE_MAX_CONCURRENT_FETCHES", "8")?;
    let inter_request_delay_ms = parse_u64("VITRINE_INTER_REQUEST_DELAY_MS", "0")?;
    let cache_negative_results = parse_bool("VITRINE_CACHE_NEGATIVE_RESULTS", "true")?;

    Ok(AppConfig {
        seeds_path,
        output_dir,
        user_agent,
        request_timeout_secs,
        max_concurrent_fetches,
        inter_request_delay_ms,
        cache_negative_results,
        sitemap_url,
        log_level,
    })
}
