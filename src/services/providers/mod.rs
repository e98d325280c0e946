/// Catalog data provider abstraction
///
/// The recommendation core only needs a fresh snapshot of purchasable products.
/// Providers hide where that snapshot comes from (the Storefront GraphQL API in
/// production, fixed catalogs in tests).
use crate::{error::CatalogError, models::CatalogSnapshot};

pub mod storefront;

pub use storefront::StorefrontProvider;

/// Trait for product catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch up to `limit` of the most recently updated products
    ///
    /// Products that cannot be sold (no variants) must not be part of the
    /// returned snapshot.
    async fn fetch_catalog(&self, limit: usize) -> Result<CatalogSnapshot, CatalogError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
