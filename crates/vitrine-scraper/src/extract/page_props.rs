//! Walker for the page-props payload layout (`props.pageProps.productData`).

use serde_json::Value;

use vitrine_core::{ProductRecord, SkuRecord};

use crate::clean::{clean_description, ensure_https};

use super::{array_at, category_path, non_empty, price_label, text_at};

/// Maps a `productData` object into one normalized record.
pub(super) fn extract_product(product_data: &Value, url: &str) -> ProductRecord {
    let color_names = option_values(product_data, "color");
    let size_names = option_values(product_data, "size");

    let alternate_image_urls: Vec<String> = array_at(product_data, &["media", "alternates"])
        .iter()
        .filter_map(|alt| non_empty(ensure_https(&text_at(alt, &["dynamic", "url"]))))
        .collect();

    let skus = array_at(product_data, &["skus"])
        .iter()
        .map(extract_sku)
        .collect();

    ProductRecord {
        id: text_at(product_data, &["id"]),
        category: category_path(array_at(product_data, &["hierarchy"])),
        name: text_at(product_data, &["name"]),
        brand: text_at(product_data, &["designer", "name"]),
        description: clean_description(&text_at(product_data, &["details", "longDesc"])),
        price: price_label(
            &text_at(product_data, &["price", "currencyCode"]),
            &text_at(product_data, &["price", "retailPrice"]),
        ),
        high_price: None,
        color: color_names.join(", "),
        size: non_empty(size_names.join(", ")),
        image_url: ensure_https(&text_at(product_data, &["media", "main", "dynamic", "url"])),
        alternate_image_urls,
        url: url.to_owned(),
        skus,
    }
}

/// Collects the named values of the product option whose label matches
/// `label` case-insensitively (the site mixes `"Color"`, `"color"`, `"SIZE"`).
fn option_values(product_data: &Value, label: &str) -> Vec<String> {
    let mut names = Vec::new();
    for option in array_at(product_data, &["options", "productOptions"]) {
        if !text_at(option, &["label"]).eq_ignore_ascii_case(label) {
            continue;
        }
        for value in array_at(option, &["values"]) {
            let name = text_at(value, &["name"]);
            if !name.is_empty() {
                names.push(name);
            }
        }
    }
    names
}

fn extract_sku(sku: &Value) -> SkuRecord {
    SkuRecord {
        id: text_at(sku, &["id"]),
        status: text_at(sku, &["stockStatusMessage"]),
        color: text_at(sku, &["color", "name"]),
        size: non_empty(text_at(sku, &["size", "name"])),
        image_url: non_empty(ensure_https(&text_at(sku, &["media", "main", "dynamic", "url"]))),
        stock_level: text_at(sku, &["stockLevel"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_product_data() -> Value {
        json!({
            "id": "prod200",
            "name": "Suede Pump",
            "designer": {"name": "Acme"},
            "details": {"longDesc": "<p>Suede upper,  leather sole</p>"},
            "price": {"retailPrice": 250, "currencyCode": "USD"},
            "hierarchy": [
                {"level1": "Women", "level2": "Shoes"},
                {"level1": "Pumps"}
            ],
            "media": {
                "main": {"dynamic": {"url": "//images.example.com/main.jpg"}},
                "alternates": [
                    {"dynamic": {"url": "//images.example.com/alt1.jpg"}},
                    {"dynamic": {"url": ""}}
                ]
            },
            "options": {
                "productOptions": [
                    {"label": "Color", "values": [{"name": "Black"}, {"name": "Red"}]},
                    {"label": "size", "values": [{"name": "36"}, {"name": "37"}]}
                ]
            },
            "skus": [
                {
                    "id": "sku1",
                    "stockStatusMessage": "In Stock",
                    "color": {"name": "Black"},
                    "size": {"name": "36"},
                    "stockLevel": 3
                },
                {
                    "id": "sku2",
                    "stockStatusMessage": "Backorder",
                    "color": {"name": "Red"},
                    "stockLevel": "out of stock"
                }
            ]
        })
    }

    #[test]
    fn maps_every_field() {
        let record = extract_product(&full_product_data(), "https://shop.example.com/p/pump");
        assert_eq!(record.id, "prod200");
        assert_eq!(record.name, "Suede Pump");
        assert_eq!(record.brand, "Acme");
        assert_eq!(record.category, "Women > Shoes > Pumps");
        assert_eq!(record.description, "Suede upper. leather sole");
        assert_eq!(record.price, "USD 250");
        assert_eq!(record.color, "Black, Red");
        assert_eq!(record.size.as_deref(), Some("36, 37"));
        assert_eq!(record.image_url, "https://images.example.com/main.jpg");
        assert_eq!(
            record.alternate_image_urls,
            vec!["https://images.example.com/alt1.jpg"]
        );
        assert_eq!(record.url, "https://shop.example.com/p/pump");
    }

    #[test]
    fn maps_skus_one_to_one() {
        let record = extract_product(&full_product_data(), "https://shop.example.com/p/pump");
        assert_eq!(record.skus.len(), 2);

        let first = &record.skus[0];
        assert_eq!(first.id, "sku1");
        assert_eq!(first.status, "In Stock");
        assert_eq!(first.color, "Black");
        assert_eq!(first.size.as_deref(), Some("36"));
        assert_eq!(first.stock_level, "3");

        let second = &record.skus[1];
        assert_eq!(second.id, "sku2");
        assert!(second.size.is_none());
        assert_eq!(second.stock_level, "out of stock");
    }

    #[test]
    fn empty_object_defaults_every_field() {
        let record = extract_product(&json!({}), "http://x");
        assert_eq!(record.id, "");
        assert_eq!(record.category, "");
        assert_eq!(record.name, "");
        assert_eq!(record.brand, "");
        assert_eq!(record.description, "");
        assert_eq!(record.price, "");
        assert_eq!(record.color, "");
        assert!(record.size.is_none());
        assert_eq!(record.image_url, "");
        assert!(record.alternate_image_urls.is_empty());
        assert!(record.skus.is_empty());
        assert!(!record.is_persistable());
    }

    #[test]
    fn option_label_match_is_case_insensitive() {
        let data = json!({
            "options": {"productOptions": [
                {"label": "COLOR", "values": [{"name": "Navy"}]}
            ]}
        });
        let record = extract_product(&data, "http://x");
        assert_eq!(record.color, "Navy");
    }

    #[test]
    fn unrelated_option_labels_are_ignored() {
        let data = json!({
            "options": {"productOptions": [
                {"label": "monogram", "values": [{"name": "Yes"}]}
            ]}
        });
        let record = extract_product(&data, "http://x");
        assert_eq!(record.color, "");
        assert!(record.size.is_none());
    }

    #[test]
    fn image_url_is_https_prefixed() {
        let data = json!({
            "media": {"main": {"dynamic": {"url": "//images.example.com/a.jpg"}}}
        });
        let record = extract_product(&data, "http://x");
        assert_eq!(record.image_url, "https://images.example.com/a.jpg");
    }

    #[test]
    fn missing_image_stays_empty_not_bare_scheme() {
        let record = extract_product(&json!({}), "http://x");
        assert_eq!(record.image_url, "");
    }
}
