use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogSnapshot, ProductRecord},
};

use super::history::HistoryAnalysis;
use super::random::RandomSource;

/// Boost for a candidate in the preferred category
pub const PREFERRED_CATEGORY_BOOST: f64 = 10.0;
/// Boost for a candidate that complements the viewed product's category
pub const COMPLEMENT_BOOST: f64 = 5.0;
/// Price is divided by this before being added to the score
pub const PRICE_DIVISOR: f64 = 50.0;

/// Static mapping from a category to the categories that complement it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplementTable {
    map: HashMap<String, Vec<String>>,
}

impl ComplementTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Add a rule while consuming `self`, enabling chaining.
    pub fn with_rule<I, S>(mut self, category: &str, complements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.map
            .entry(category.to_string())
            .or_default()
            .extend(complements.into_iter().map(Into::into));
        self
    }

    /// Whether `candidate` complements `current`
    pub fn complements(&self, current: &str, candidate: &str) -> bool {
        self.map
            .get(current)
            .is_some_and(|complements| complements.iter().any(|c| c == candidate))
    }
}

impl Default for ComplementTable {
    fn default() -> Self {
        Self::new().with_rule("Jackets", ["Shirts", "T-Shirts", "Sweaters"])
    }
}

/// A catalog product paired with its total score for one request
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<'a> {
    pub product: &'a ProductRecord,
    pub score: f64,
}

/// Every catalog id except the current product and anything already clicked
pub fn filter_candidates<'a>(
    catalog: &'a CatalogSnapshot,
    current_product_id: &str,
    history: &HistoryAnalysis,
) -> Vec<&'a str> {
    catalog
        .ids()
        .filter(|id| *id != current_product_id && !history.was_clicked(id))
        .collect()
}

/// Category and price components of a candidate's score, without noise
pub fn base_score(
    candidate: &ProductRecord,
    preferred_category: &str,
    current_category: Option<&str>,
    complements: &ComplementTable,
) -> f64 {
    let mut score = 0.0;

    if candidate.category == preferred_category {
        score += PREFERRED_CATEGORY_BOOST;
    }

    if current_category.is_some_and(|current| complements.complements(current, &candidate.category))
    {
        score += COMPLEMENT_BOOST;
    }

    score + candidate.price / PRICE_DIVISOR
}

/// Scores candidates and orders them highest first
///
/// Each candidate gets a fresh noise term in `[0, 1)` so near-equal products
/// rotate between requests. A candidate id missing from the catalog is an
/// internal error.
pub fn rank_candidates<'a>(
    candidates: &[&str],
    catalog: &'a CatalogSnapshot,
    preferred_category: &str,
    current_category: Option<&str>,
    complements: &ComplementTable,
    rng: &mut dyn RandomSource,
) -> AppResult<Vec<ScoredCandidate<'a>>> {
    let mut scored = candidates
        .iter()
        .map(|id| {
            let product = catalog.get(id).ok_or_else(|| {
                AppError::Internal(format!("candidate {} is missing from the catalog", id))
            })?;

            Ok(ScoredCandidate {
                product,
                score: base_score(product, preferred_category, current_category, complements)
                    + rng.next_unit(),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(scored)
}
