//! Product extraction from the JSON payload embedded in detail pages.
//!
//! The upstream rendering framework emits one of two mutually exclusive root
//! layouts. Shapes are tried in order and the first match wins, mirroring
//! the strategy dispatch used elsewhere in the crawler:
//!
//! 1. `props.pageProps.productData`: the page-props layout, one record.
//! 2. top-level `productCatalog.product`: the catalog layout, at most one
//!    record in practice.
//! 3. neither: empty result; the caller decides how loudly to complain.
//!
//! Both walkers default every field independently: a missing intermediate
//! key degrades to an empty string, empty list, or `"-"` placeholder, never
//! an error. The payload is uncontrolled third-party output and partial
//! pages are routine.

mod catalog;
mod page_props;

use scraper::{Html, Selector};
use serde_json::Value;

use vitrine_core::ProductRecord;

/// Locates the `<script type="application/json">` block in a detail page and
/// parses its contents.
///
/// Returns `None` when the block is absent, empty, or not valid JSON; a
/// malformed payload is treated the same as a missing one (logged, not
/// propagated).
#[must_use]
pub fn parse_embedded_payload(html: &str) -> Option<Value> {
    let selector = Selector::parse(r#"script[type="application/json"]"#).expect("valid selector");
    let document = Html::parse_document(html);
    let raw: String = document.select(&selector).next()?.text().collect();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str(trimmed) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "embedded product payload is not valid JSON");
            None
        }
    }
}

/// Maps a parsed detail-page payload into normalized records.
///
/// `url` is stored on each record verbatim; callers pass the cleaned
/// (query-stripped) detail URL.
#[must_use]
pub fn extract_products(payload: &Value, url: &str) -> Vec<ProductRecord> {
    if let Some(product_data) = payload.pointer("/props/pageProps/productData") {
        tracing::debug!(url, "detected page-props product payload");
        return vec![page_props::extract_product(product_data, url)];
    }
    if let Some(catalog) = payload.get("productCatalog") {
        tracing::debug!(url, "detected catalog product payload");
        return catalog::extract_products(catalog, url);
    }
    vec![]
}

// ---------------------------------------------------------------------------
// Defensive Value navigation, shared by both shape walkers
// ---------------------------------------------------------------------------

/// Follows `path` through nested objects. `None` when any key is absent or
/// the final node is JSON `null`.
pub(crate) fn node_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Renders a leaf value as text. Strings pass through, numbers and booleans
/// are formatted, anything else (objects, arrays) renders empty.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Text at `path`, empty string when absent.
pub(crate) fn text_at(value: &Value, path: &[&str]) -> String {
    node_at(value, path).map(value_text).unwrap_or_default()
}

/// Text at `path`, with a caller-chosen placeholder when absent.
pub(crate) fn text_at_or(value: &Value, path: &[&str], default: &str) -> String {
    node_at(value, path)
        .map(value_text)
        .unwrap_or_else(|| default.to_owned())
}

/// Array at `path`, empty slice when absent or not an array.
pub(crate) fn array_at<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    node_at(value, path)
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

/// Wraps a string in `Some` only when non-empty.
pub(crate) fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Flattens a hierarchy list of label→value maps into a `" > "`-joined
/// category path, keeping only truthy values.
pub(crate) fn category_path(hierarchy: &[Value]) -> String {
    let mut levels = Vec::new();
    for entry in hierarchy {
        if let Value::Object(map) = entry {
            for value in map.values() {
                let text = value_text(value);
                if !text.is_empty() {
                    levels.push(text);
                }
            }
        }
    }
    levels.join(" > ")
}

/// Joins a currency code and amount into the persisted price label, e.g.
/// `"USD 50"`. Either side may be missing; a fully absent price renders
/// empty (and fails the orchestrator's persistence filter).
pub(crate) fn price_label(currency: &str, amount: &str) -> String {
    format!("{currency} {amount}").trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dispatches_page_props_shape() {
        let payload = json!({
            "props": {"pageProps": {"productData": {
                "id": "123",
                "name": "Shirt",
                "designer": {"name": "Acme"},
                "price": {"retailPrice": 50, "currencyCode": "USD"}
            }}}
        });
        let records = extract_products(&payload, "http://x/y");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, "123");
        assert_eq!(record.name, "Shirt");
        assert_eq!(record.brand, "Acme");
        assert_eq!(record.price, "USD 50");
        assert_eq!(record.url, "http://x/y");
    }

    #[test]
    fn dispatches_catalog_shape() {
        let payload = json!({
            "productCatalog": {"product": {
                "id": "p9",
                "linkedData": {
                    "name": "Loafer",
                    "brand": "Maison",
                    "offers": {"priceCurrency": "EUR", "lowPrice": "320"}
                }
            }}
        });
        let records = extract_products(&payload, "http://x/z");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Loafer");
        assert_eq!(records[0].price, "EUR 320");
    }

    #[test]
    fn unknown_shape_yields_empty() {
        let payload = json!({"page": {"kind": "editorial"}});
        assert!(extract_products(&payload, "http://x").is_empty());
    }

    #[test]
    fn page_props_without_product_data_falls_through_to_catalog() {
        let payload = json!({
            "props": {"pageProps": {"layout": "search"}},
            "productCatalog": {"product": {"id": "p1", "linkedData": {"name": "Belt"}}}
        });
        let records = extract_products(&payload, "http://x");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "p1");
    }

    #[test]
    fn parse_embedded_payload_reads_script_block() {
        let html = r#"
            <html><head>
            <script type="application/json">{"productCatalog": {"product": {}}}</script>
            </head></html>
        "#;
        let payload = parse_embedded_payload(html).expect("payload expected");
        assert!(payload.get("productCatalog").is_some());
    }

    #[test]
    fn parse_embedded_payload_none_when_block_missing() {
        assert!(parse_embedded_payload("<html><body><p>hi</p></body></html>").is_none());
    }

    #[test]
    fn parse_embedded_payload_none_on_malformed_json() {
        let html = r#"<script type="application/json">{not json</script>"#;
        assert!(parse_embedded_payload(html).is_none());
    }

    #[test]
    fn parse_embedded_payload_ignores_other_script_types() {
        let html = r#"<script type="text/javascript">var x = 1;</script>"#;
        assert!(parse_embedded_payload(html).is_none());
    }

    #[test]
    fn category_path_keeps_only_truthy_values() {
        let hierarchy = json!([
            {"level1": "Women", "level2": ""},
            {"level1": "Shoes"}
        ]);
        let hierarchy = hierarchy.as_array().unwrap();
        assert_eq!(category_path(hierarchy), "Women > Shoes");
    }

    #[test]
    fn category_path_empty_hierarchy() {
        assert_eq!(category_path(&[]), "");
    }

    #[test]
    fn price_label_trims_missing_sides() {
        assert_eq!(price_label("USD", "50"), "USD 50");
        assert_eq!(price_label("", "50"), "50");
        assert_eq!(price_label("USD", ""), "USD");
        assert_eq!(price_label("", ""), "");
    }

    #[test]
    fn text_at_renders_numbers() {
        let value = json!({"stockLevel": 7});
        assert_eq!(text_at(&value, &["stockLevel"]), "7");
    }

    #[test]
    fn text_at_null_is_absent() {
        let value = json!({"stockLevel": null});
        assert_eq!(text_at(&value, &["stockLevel"]), "");
        assert_eq!(text_at_or(&value, &["stockLevel"], "-"), "-");
    }
}
