use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("XML parse error in sitemap: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("failed to decompress sitemap from {url}: {source}")]
    Gunzip {
        url: String,
        #[source]
        source: std::io::Error,
    },
}
