use serde::{Deserialize, Serialize};

/// A product extracted from a retail detail page, normalized for storage
/// regardless of which embedded payload shape it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Upstream product ID, stored as a string to avoid precision loss.
    pub id: String,
    /// Category hierarchy flattened to a `" > "`-joined path, e.g.
    /// `"Women > Shoes > Pumps"`. Empty when the page carries no hierarchy.
    pub category: String,
    pub name: String,
    pub brand: String,
    /// Plain-text description: tags stripped, whitespace collapsed, commas
    /// replaced by periods.
    pub description: String,
    /// Currency code and amount, space-separated, e.g. `"USD 50"`.
    pub price: String,
    /// Upper bound of a price range, when the page advertises one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_price: Option<String>,
    /// Available color names, `", "`-joined. Empty when no color option exists.
    pub color: String,
    /// Available size names, `", "`-joined, when the page exposes a size option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Primary image URL. Always scheme-qualified (`https:`) when non-empty.
    pub image_url: String,
    /// Additional gallery image URLs, scheme-qualified.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_image_urls: Vec<String>,
    /// The detail page this record was extracted from, query string stripped.
    pub url: String,
    /// Purchasable variants, in payload order.
    pub skus: Vec<SkuRecord>,
}

impl ProductRecord {
    /// Returns `true` when the record carries every field required for
    /// persistence: a non-empty id, name, brand, and price.
    #[must_use]
    pub fn is_persistable(&self) -> bool {
        !self.id.is_empty()
            && !self.name.is_empty()
            && !self.brand.is_empty()
            && !self.price.is_empty()
    }

    /// Returns the number of SKUs on this record.
    #[must_use]
    pub fn sku_count(&self) -> usize {
        self.skus.len()
    }
}

/// A single purchasable variant of a [`ProductRecord`]. Owned exclusively by
/// its parent record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuRecord {
    pub id: String,
    /// Upstream stock status message, e.g. `"In Stock"`. `"-"` when absent
    /// from a catalog-shape payload.
    pub status: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Per-SKU image URL, scheme-qualified, when the payload provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Stock level as reported upstream. The source is inconsistent (numbers
    /// on some pages, status strings on others) so this is always a string.
    pub stock_level: String,
}

/// One `(URL, LastModified)` pair from the category sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub url: String,
    /// `lastmod` as the sitemap reports it, e.g. `"2024-08-01"`. Optional in
    /// the sitemap schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sku(id: &str) -> SkuRecord {
        SkuRecord {
            id: id.to_string(),
            status: "In Stock".to_string(),
            color: "Black".to_string(),
            size: Some("M".to_string()),
            image_url: None,
            stock_level: "3".to_string(),
        }
    }

    fn make_record(skus: Vec<SkuRecord>) -> ProductRecord {
        ProductRecord {
            id: "prod123".to_string(),
            category: "Women > Shoes".to_string(),
            name: "Suede Pump".to_string(),
            brand: "Acme".to_string(),
            description: "A suede pump.".to_string(),
            price: "USD 250".to_string(),
            high_price: None,
            color: "Black, Red".to_string(),
            size: Some("M, L".to_string()),
            image_url: "https://images.example.com/a.jpg".to_string(),
            alternate_image_urls: vec![],
            url: "https://shop.example.com/p/suede-pump".to_string(),
            skus,
        }
    }

    #[test]
    fn is_persistable_with_all_required_fields() {
        assert!(make_record(vec![]).is_persistable());
    }

    #[test]
    fn is_persistable_false_when_id_empty() {
        let mut record = make_record(vec![]);
        record.id = String::new();
        assert!(!record.is_persistable());
    }

    #[test]
    fn is_persistable_false_when_name_empty() {
        let mut record = make_record(vec![]);
        record.name = String::new();
        assert!(!record.is_persistable());
    }

    #[test]
    fn is_persistable_false_when_brand_empty() {
        let mut record = make_record(vec![]);
        record.brand = String::new();
        assert!(!record.is_persistable());
    }

    #[test]
    fn is_persistable_false_when_price_empty() {
        let mut record = make_record(vec![]);
        record.price = String::new();
        assert!(!record.is_persistable());
    }

    #[test]
    fn sku_count_matches_skus_len() {
        let record = make_record(vec![make_sku("1"), make_sku("2")]);
        assert_eq!(record.sku_count(), 2);
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let record = make_record(vec![]);
        let json = serde_json::to_value(&record).expect("serialization failed");
        assert!(json.get("high_price").is_none());
        assert!(json.get("alternate_image_urls").is_none());
        assert_eq!(json["size"], "M, L");
    }

    #[test]
    fn serde_roundtrip_record_with_skus() {
        let record = make_record(vec![make_sku("sku9")]);
        let json = serde_json::to_string(&record).expect("serialization failed");
        let decoded: ProductRecord = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(decoded, record);
    }

    #[test]
    fn category_entry_roundtrips_without_lastmod() {
        let entry = CategoryEntry {
            url: "https://shop.example.com/c/women".to_string(),
            last_modified: None,
        };
        let json = serde_json::to_string(&entry).expect("serialization failed");
        assert!(!json.contains("last_modified"));
        let decoded: CategoryEntry = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(decoded, entry);
    }
}
