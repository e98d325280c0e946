use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Category assigned to products whose type is blank or unknown
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Image shown for products without a featured image
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/100x100/CCCCCC/000?text=No+Image";

/// A purchasable product as returned to the storefront widget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub category: String,
    pub price: f64,
    pub image: String,
    pub default_variant_id: String,
    pub name: String,
}

impl ProductRecord {
    /// Whether the product carries a real category rather than the sentinel
    pub fn is_categorized(&self) -> bool {
        self.category != UNCATEGORIZED
    }
}

/// Products fetched for a single request, keyed by product id
///
/// Ordered by id so iteration is reproducible for a given catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    products: BTreeMap<String, ProductRecord>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product, replacing any earlier record with the same id
    pub fn insert(&mut self, product: ProductRecord) {
        self.products.insert(product.id.clone(), product);
    }

    pub fn get(&self, id: &str) -> Option<&ProductRecord> {
        self.products.get(id)
    }

    /// Category of the given product, if it is in the catalog
    pub fn category_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(|product| product.category.as_str())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.products.keys().map(String::as_str)
    }

    pub fn products(&self) -> impl Iterator<Item = &ProductRecord> {
        self.products.values()
    }

    /// Distinct categories other than the uncategorized sentinel, sorted
    pub fn known_categories(&self) -> Vec<&str> {
        self.products()
            .filter(|product| product.is_categorized())
            .map(|product| product.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl FromIterator<ProductRecord> for CatalogSnapshot {
    fn from_iter<I: IntoIterator<Item = ProductRecord>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for product in iter {
            snapshot.insert(product);
        }
        snapshot
    }
}
