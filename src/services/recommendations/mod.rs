use serde::Serialize;
use serde_json::Value;

use crate::{
    error::AppResult,
    models::{CatalogSnapshot, ProductRecord},
};

pub mod history;
pub mod preference;
pub mod random;
pub mod scoring;

pub use history::{analyze_history, HistoryAnalysis, WeightedCounts};
pub use preference::{resolve_preferred_category, PreferenceSource, PreferredCategory};
pub use random::{entropy_source, seeded_source, FixedSource, RandomSource, RngSource};
pub use scoring::{filter_candidates, rank_candidates, ComplementTable, ScoredCandidate};

/// Most products returned per request
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Message returned when the catalog could not be loaded or is empty
pub const EMPTY_CATALOG_MESSAGE: &str = "Failed to load catalog.";

/// Body of a successful recommendation response
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendations {
    pub recommendations: Vec<ProductRecord>,
    pub message: String,
}

impl Recommendations {
    fn empty(message: impl Into<String>) -> Self {
        Self {
            recommendations: Vec::new(),
            message: message.into(),
        }
    }
}

/// Picks complementary products for the product being viewed
///
/// Pipeline: analyze history, resolve the preferred category, drop the current
/// and already clicked products, score, then keep the top three.
#[derive(Debug, Clone)]
pub struct Recommender {
    complements: ComplementTable,
    source_name: String,
}

impl Recommender {
    /// `source_name` names the catalog origin in response messages
    pub fn new(complements: ComplementTable, source_name: impl Into<String>) -> Self {
        Self {
            complements,
            source_name: source_name.into(),
        }
    }

    pub fn recommend(
        &self,
        catalog: &CatalogSnapshot,
        current_product_id: &str,
        history: &[Value],
        rng: &mut dyn RandomSource,
    ) -> AppResult<Recommendations> {
        if catalog.is_empty() {
            return Ok(Recommendations::empty(EMPTY_CATALOG_MESSAGE));
        }

        let analysis = analyze_history(history);
        let preferred =
            resolve_preferred_category(&analysis.counts, catalog, current_product_id, rng);

        tracing::debug!(
            current_product_id = %current_product_id,
            preferred_category = %preferred.category,
            preference_source = %preferred.source,
            weighted_products = analysis.counts.len(),
            "Resolved preferred category"
        );

        let candidates = filter_candidates(catalog, current_product_id, &analysis);
        if candidates.is_empty() {
            return Ok(Recommendations::empty(format!(
                "No products left to recommend for preferred category: {}.",
                preferred.category
            )));
        }

        let ranked = rank_candidates(
            &candidates,
            catalog,
            &preferred.category,
            catalog.category_of(current_product_id),
            &self.complements,
            rng,
        )?;

        Ok(Recommendations {
            recommendations: top_products(&ranked),
            message: format!(
                "Recommendations based on preferred category: {} from live {} data.",
                preferred.category, self.source_name
            ),
        })
    }
}

/// Copies the first `MAX_RECOMMENDATIONS` ranked records into the response
fn top_products(ranked: &[ScoredCandidate<'_>]) -> Vec<ProductRecord> {
    ranked
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|candidate| candidate.product.clone())
        .collect()
}
