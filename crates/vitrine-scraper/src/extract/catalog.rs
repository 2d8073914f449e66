//! Walker for the catalog payload layout (top-level `productCatalog`).
//!
//! This layout wraps most product fields in a schema.org `linkedData` block,
//! and its SKU list uses `"-"` placeholders where the page-props layout uses
//! empty strings. Those placeholders are preserved as-is.

use serde_json::Value;

use vitrine_core::{ProductRecord, SkuRecord};

use crate::clean::{clean_description, ensure_https};

use super::{
    array_at, category_path, node_at, non_empty, price_label, text_at, text_at_or, value_text,
};

/// Maps a `productCatalog` object into records. Empty when the expected
/// `product` child is absent.
pub(super) fn extract_products(catalog: &Value, url: &str) -> Vec<ProductRecord> {
    let Some(product) = node_at(catalog, &["product"]) else {
        return vec![];
    };

    let currency = text_at(product, &["linkedData", "offers", "priceCurrency"]);
    let low_price = text_at(product, &["linkedData", "offers", "lowPrice"]);
    let high_price = text_at(product, &["linkedData", "offers", "highPrice"]);

    let colors: Vec<String> = array_at(product, &["linkedData", "offers", "offers"])
        .iter()
        .filter_map(|offer| non_empty(text_at(offer, &["itemOffered", "color"])))
        .collect();

    let skus = array_at(product, &["skus"]).iter().map(extract_sku).collect();

    vec![ProductRecord {
        id: text_at(product, &["id"]),
        category: category_path(array_at(product, &["hierarchy"])),
        name: text_at(product, &["linkedData", "name"]),
        brand: brand_text(product),
        description: clean_description(&text_at(product, &["linkedData", "description"])),
        price: price_label(&currency, &low_price),
        high_price: if high_price.is_empty() {
            None
        } else {
            Some(price_label(&currency, &high_price))
        },
        color: colors.join(", "),
        size: None,
        image_url: ensure_https(&image_text(product)),
        alternate_image_urls: vec![],
        url: url.to_owned(),
        skus,
    }]
}

/// schema.org `brand` may be a bare string or a `{"name": ...}` object.
fn brand_text(product: &Value) -> String {
    match node_at(product, &["linkedData", "brand"]) {
        Some(Value::Object(map)) => map.get("name").map(value_text).unwrap_or_default(),
        Some(other) => value_text(other),
        None => String::new(),
    }
}

/// schema.org `image` may be a bare URL or an array of URLs; the first entry
/// is the primary image.
fn image_text(product: &Value) -> String {
    match node_at(product, &["linkedData", "image"]) {
        Some(Value::Array(items)) => items.first().map(value_text).unwrap_or_default(),
        Some(other) => value_text(other),
        None => String::new(),
    }
}

fn extract_sku(sku: &Value) -> SkuRecord {
    SkuRecord {
        id: text_at_or(sku, &["id"], "-"),
        status: text_at_or(sku, &["stockStatusMessage"], "-"),
        color: text_at(sku, &["color", "name"]),
        size: non_empty(text_at(sku, &["size", "name"])),
        image_url: non_empty(ensure_https(&text_at(sku, &["media", "main", "dynamic", "url"]))),
        stock_level: text_at_or(sku, &["stockLevel"], "-"),
    }
}
