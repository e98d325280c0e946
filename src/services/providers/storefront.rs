/// Storefront GraphQL API provider
///
/// Pulls the most recently updated products with a single GraphQL query and
/// flattens them into a `CatalogSnapshot`. Nothing is cached: every call hits
/// the storefront.
use crate::{
    config::Config,
    error::CatalogError,
    models::{ApiGraphQlResponse, ApiProduct, CatalogSnapshot, ProductRecord},
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;
use serde_json::json;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

const PRODUCTS_QUERY: &str = r#"
query RecommendedProducts($num: Int!) {
  products(first: $num, sortKey: UPDATED_AT, reverse: true) {
    edges {
      node {
        id
        title
        productType
        featuredImage {
          url
        }
        priceRange {
          maxVariantPrice {
            amount
          }
        }
        variants(first: 1) {
          edges {
            node {
              id
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Clone)]
pub struct StorefrontProvider {
    http_client: HttpClient,
    graphql_url: Option<String>,
    access_token: Option<String>,
}

impl StorefrontProvider {
    /// Builds a provider whose HTTP client enforces the configured timeout
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let http_client = HttpClient::builder()
            .timeout(config.catalog_timeout())
            .build()?;

        Ok(Self {
            http_client,
            graphql_url: config.storefront_url(),
            access_token: config
                .storefront_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
        })
    }

    /// Converts a GraphQL response body into a snapshot, dropping unsellable products
    fn flatten_response(
        &self,
        response: ApiGraphQlResponse,
    ) -> Result<CatalogSnapshot, CatalogError> {
        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(CatalogError::GraphQl(messages.join("; ")));
        }

        let data = response.data.ok_or(CatalogError::EmptyResponse)?;

        Ok(flatten_products(
            data.products.edges.into_iter().map(|edge| edge.node),
        ))
    }
}

/// Flattens API products into a snapshot, logging every product left out
pub fn flatten_products<I>(products: I) -> CatalogSnapshot
where
    I: IntoIterator<Item = ApiProduct>,
{
    let mut snapshot = CatalogSnapshot::new();

    for product in products {
        match ProductRecord::try_from(product) {
            Ok(record) => snapshot.insert(record),
            Err(reason) => tracing::warn!(reason = %reason, "Skipping catalog product"),
        }
    }

    snapshot
}

#[async_trait::async_trait]
impl CatalogProvider for StorefrontProvider {
    async fn fetch_catalog(&self, limit: usize) -> Result<CatalogSnapshot, CatalogError> {
        let (Some(url), Some(token)) = (&self.graphql_url, &self.access_token) else {
            return Err(CatalogError::MissingCredentials);
        };

        let payload = json!({
            "query": PRODUCTS_QUERY,
            "variables": { "num": limit },
        });

        let response = self
            .http_client
            .post(url)
            .header(ACCESS_TOKEN_HEADER, token)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ApiGraphQlResponse = response.json().await?;
        let snapshot = self.flatten_response(body)?;

        tracing::info!(
            products = snapshot.len(),
            limit = limit,
            provider = self.name(),
            "Catalog fetched"
        );

        Ok(snapshot)
    }

    fn name(&self) -> &'static str {
        "storefront"
    }
}
