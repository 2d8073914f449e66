//! HTTP client for listing, detail, and sitemap fetches.

use std::time::Duration;

use crate::error::ScraperError;

/// Thin wrapper around one shared `reqwest::Client` with the crawl's fixed
/// `User-Agent` and timeouts baked in at build time.
///
/// Responses are mapped to typed errors: 404 becomes [`ScraperError::NotFound`],
/// any other non-2xx becomes [`ScraperError::UnexpectedStatus`], transport
/// failures become [`ScraperError::Http`]. There are no retries; a failed
/// fetch is the caller's problem to degrade or propagate.
pub struct PageClient {
    client: reqwest::Client,
}

impl PageClient {
    /// Creates a `PageClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches the HTML body of `url`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`]: HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self.get_checked(url).await?;
        Ok(response.text().await?)
    }

    /// Fetches the raw body of `url`. Used for the gzip-compressed sitemap,
    /// where the payload must not go through text decoding.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::fetch_html`].
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ScraperError> {
        let response = self.get_checked(url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_checked(&self, url: &str) -> Result<reqwest::Response, ScraperError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response)
    }
}
