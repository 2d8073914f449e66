//! Category sitemap fetcher.
//!
//! The site publishes its category index as a gzip-compressed sitemap
//! (`sitemap_category_1.xml.gz`) in the standard sitemap namespace. Each
//! `<url>` entry yields a [`CategoryEntry`] with the location and optional
//! `lastmod`.

use std::io::Read;

use flate2::read::GzDecoder;
use quick_xml::events::Event;
use quick_xml::Reader;

use vitrine_core::CategoryEntry;

use crate::client::PageClient;
use crate::error::ScraperError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Fetches and parses the category sitemap at `url`.
///
/// The body is gunzipped when it carries the gzip magic bytes. Servers are
/// inconsistent about `Content-Encoding` for `.xml.gz` resources, so the
/// payload itself is sniffed rather than trusting headers.
///
/// # Errors
///
/// Propagates fetch errors, [`ScraperError::Gunzip`] on a corrupt gzip body,
/// and [`ScraperError::Xml`] when the decompressed payload is not well-formed
/// XML.
pub async fn fetch_category_sitemap(
    client: &PageClient,
    url: &str,
) -> Result<Vec<CategoryEntry>, ScraperError> {
    let bytes = client.fetch_bytes(url).await?;
    let xml = decode_body(&bytes, url)?;
    let entries = parse_sitemap(&xml)?;
    tracing::info!(url, entries = entries.len(), "category sitemap parsed");
    Ok(entries)
}

fn decode_body(bytes: &[u8], url: &str) -> Result<String, ScraperError> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoder = GzDecoder::new(bytes);
        let mut xml = String::new();
        decoder
            .read_to_string(&mut xml)
            .map_err(|e| ScraperError::Gunzip {
                url: url.to_owned(),
                source: e,
            })?;
        Ok(xml)
    } else {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Streams `<url>` entries out of sitemap XML, tolerating namespace prefixes
/// on element names.
fn parse_sitemap(xml: &str) -> Result<Vec<CategoryEntry>, ScraperError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut in_url = false;
    let mut current_tag = String::new();
    let mut loc = String::new();
    let mut lastmod = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.local_name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("").to_string();
                if name == "url" {
                    in_url = true;
                    loc.clear();
                    lastmod.clear();
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name_buf = e.local_name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if name == "url" && in_url {
                    in_url = false;
                    if !loc.is_empty() {
                        entries.push(CategoryEntry {
                            url: loc.clone(),
                            last_modified: if lastmod.is_empty() {
                                None
                            } else {
                                Some(lastmod.clone())
                            },
                        });
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if in_url {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    match current_tag.as_str() {
                        "loc" => loc = text,
                        "lastmod" => lastmod = text,
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ScraperError::Xml(e)),
            _ => {}
        }
    }

    Ok(entries)
}
