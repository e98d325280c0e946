use serde::Deserialize;
use thiserror::Error;

pub mod history;
pub mod product;

pub use history::{EventType, HistoryEvent};
pub use product::{CatalogSnapshot, ProductRecord, PLACEHOLDER_IMAGE, UNCATEGORIZED};

// ============================================================================
// Storefront GraphQL API Types
// ============================================================================

/// Top-level GraphQL envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiGraphQlResponse {
    #[serde(default)]
    pub data: Option<ApiProductsData>,
    #[serde(default)]
    pub errors: Option<Vec<ApiGraphQlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiProductsData {
    pub products: ApiConnection<ApiProduct>,
}

/// Relay-style connection (`edges { node { ... } }`)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConnection<T> {
    pub edges: Vec<ApiEdge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEdge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProduct {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub featured_image: Option<ApiImage>,
    pub price_range: ApiPriceRange,
    pub variants: ApiConnection<ApiVariant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiImage {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPriceRange {
    pub max_variant_price: ApiMoney,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMoney {
    pub amount: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiVariant {
    pub id: String,
}

/// Reason a fetched product is left out of the catalog
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkippedProduct {
    #[error("product {0} has no accessible variants")]
    NoVariants(String),
    #[error("product {id} has an invalid price {amount:?}")]
    InvalidPrice { id: String, amount: String },
}

/// Strips a global id such as `gid://shopify/Product/123` down to `123`
pub fn raw_id(global_id: &str) -> &str {
    global_id.rsplit('/').next().unwrap_or(global_id)
}

impl TryFrom<ApiProduct> for ProductRecord {
    type Error = SkippedProduct;

    fn try_from(product: ApiProduct) -> Result<Self, Self::Error> {
        let id = raw_id(&product.id).to_string();

        // A product without a variant cannot be added to a cart
        let default_variant_id = product
            .variants
            .edges
            .first()
            .map(|edge| raw_id(&edge.node.id).to_string())
            .filter(|variant_id| !variant_id.is_empty())
            .ok_or_else(|| SkippedProduct::NoVariants(id.clone()))?;

        let amount = product.price_range.max_variant_price.amount;
        let price = amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite() && *price >= 0.0)
            .ok_or_else(|| SkippedProduct::InvalidPrice {
                id: id.clone(),
                amount: amount.clone(),
            })?;

        let category = product
            .product_type
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .unwrap_or(UNCATEGORIZED)
            .to_string();

        let image = product
            .featured_image
            .map(|image| image.url)
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

        Ok(ProductRecord {
            id,
            category,
            price,
            image,
            default_variant_id,
            name: product.title,
        })
    }
}
