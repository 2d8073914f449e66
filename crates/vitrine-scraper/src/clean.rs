//! Small text-normalization helpers shared by the extractors and the cache.

/// Strips the query string from a URL: everything from the first `?` onward.
///
/// Idempotent: cleaning an already-clean URL returns it unchanged.
#[must_use]
pub fn clean_url(url: &str) -> String {
    match url.find('?') {
        Some(idx) => url[..idx].to_owned(),
        None => url.to_owned(),
    }
}

/// Normalizes a raw HTML product description to plain text.
///
/// Tags are stripped, whitespace runs collapse to a single space, the result
/// is trimmed, and commas become periods (the description feeds CSV-adjacent
/// downstream consumers that treat commas as separators).
#[must_use]
pub fn clean_description(description: &str) -> String {
    let mut stripped = String::with_capacity(description.len());
    let mut in_tag = false;
    for ch in description.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(',', ".")
}

/// Qualifies an image URL with an `https:` scheme.
///
/// The upstream CDN hands out protocol-less URLs (`//cdn.example.com/x.jpg`);
/// persisted records must always carry a scheme. Empty input stays empty and
/// URLs that already carry a scheme pass through untouched.
#[must_use]
pub fn ensure_https(url: &str) -> String {
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        url.to_owned()
    } else {
        format!("https:{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_url_strips_query_string() {
        assert_eq!(
            clean_url("https://shop.example.com/p/pump?itemId=p123&index=4"),
            "https://shop.example.com/p/pump"
        );
    }

    #[test]
    fn clean_url_no_query_is_untouched() {
        assert_eq!(
            clean_url("https://shop.example.com/p/pump"),
            "https://shop.example.com/p/pump"
        );
    }

    #[test]
    fn clean_url_is_idempotent() {
        let once = clean_url("https://shop.example.com/p/pump?a=1?b=2");
        assert_eq!(clean_url(&once), once);
    }

    #[test]
    fn clean_url_empty_query_only() {
        assert_eq!(clean_url("?a=1"), "");
    }

    #[test]
    fn clean_description_strips_tags_and_collapses_whitespace() {
        assert_eq!(clean_description("<p>Hello,  world</p>"), "Hello. world");
    }

    #[test]
    fn clean_description_trims_surrounding_whitespace() {
        assert_eq!(
            clean_description("  <div> Leather upper </div>\n"),
            "Leather upper"
        );
    }

    #[test]
    fn clean_description_nested_tags() {
        assert_eq!(
            clean_description("<ul><li>Suede</li><li>Made in Italy</li></ul>"),
            "SuedeMade in Italy"
        );
    }

    #[test]
    fn clean_description_empty_input() {
        assert_eq!(clean_description(""), "");
    }

    #[test]
    fn ensure_https_prefixes_protocol_less_url() {
        assert_eq!(
            ensure_https("//images.example.com/a.jpg"),
            "https://images.example.com/a.jpg"
        );
    }

    #[test]
    fn ensure_https_keeps_existing_scheme() {
        assert_eq!(
            ensure_https("https://images.example.com/a.jpg"),
            "https://images.example.com/a.jpg"
        );
        assert_eq!(
            ensure_https("http://images.example.com/a.jpg"),
            "http://images.example.com/a.jpg"
        );
    }

    #[test]
    fn ensure_https_empty_stays_empty() {
        assert_eq!(ensure_https(""), "");
    }
}
