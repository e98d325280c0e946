use crate::{models::CatalogSnapshot, services::providers::CatalogProvider};

/// Fetches a fresh catalog for one request
///
/// Provider failures never reach the caller: they are logged and the request
/// continues with an empty snapshot.
pub async fn load_catalog(provider: &dyn CatalogProvider, limit: usize) -> CatalogSnapshot {
    match provider.fetch_catalog(limit).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(
                error = %e,
                provider = provider.name(),
                "Catalog fetch failed, continuing with empty catalog"
            );
            CatalogSnapshot::new()
        }
    }
}
