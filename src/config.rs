use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Storefront host, e.g. `example.myshopify.com`
    #[serde(default)]
    pub store_domain: Option<String>,

    /// Storefront API access token
    #[serde(default)]
    pub storefront_token: Option<String>,

    /// Storefront API version used in the GraphQL path
    #[serde(default = "default_api_version")]
    pub storefront_api_version: String,

    /// Number of most recently updated products fetched per request
    #[serde(default = "default_catalog_limit")]
    pub catalog_limit: usize,

    /// Timeout for the catalog fetch, in seconds
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,

    /// Data source named in recommendation messages
    #[serde(default = "default_catalog_source_name")]
    pub catalog_source_name: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_api_version() -> String {
    "2023-10".to_string()
}

fn default_catalog_limit() -> usize {
    100
}

fn default_catalog_timeout_secs() -> u64 {
    10
}

fn default_catalog_source_name() -> String {
    "Shopify".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// GraphQL endpoint of the storefront, if a domain is configured
    pub fn storefront_url(&self) -> Option<String> {
        self.store_domain
            .as_deref()
            .map(str::trim)
            .filter(|domain| !domain.is_empty())
            .map(|domain| {
                format!(
                    "https://{}/api/{}/graphql.json",
                    domain, self.storefront_api_version
                )
            })
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
