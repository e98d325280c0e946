use std::fmt;

use crate::models::{CatalogSnapshot, UNCATEGORIZED};

use super::history::WeightedCounts;
use super::random::RandomSource;

/// Which signal produced the preferred category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceSource {
    /// Category of the most weighted product in the history
    History,
    /// Category of the product being viewed
    CurrentProduct,
    /// Random pick among the catalog's categories
    Random,
    /// No category signal at all
    Fallback,
}

impl fmt::Display for PreferenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PreferenceSource::History => "history",
            PreferenceSource::CurrentProduct => "current_product",
            PreferenceSource::Random => "random",
            PreferenceSource::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferredCategory {
    pub category: String,
    pub source: PreferenceSource,
}

fn known_category<'a>(catalog: &'a CatalogSnapshot, id: &str) -> Option<&'a str> {
    catalog
        .category_of(id)
        .filter(|category| *category != UNCATEGORIZED)
}

/// Resolves the category to optimize for, first match wins:
/// history, then the current product, then a random catalog category.
pub fn resolve_preferred_category(
    counts: &WeightedCounts,
    catalog: &CatalogSnapshot,
    current_product_id: &str,
    rng: &mut dyn RandomSource,
) -> PreferredCategory {
    if let Some(category) = counts
        .most_frequent()
        .and_then(|id| known_category(catalog, id))
    {
        return PreferredCategory {
            category: category.to_string(),
            source: PreferenceSource::History,
        };
    }

    if let Some(category) = known_category(catalog, current_product_id) {
        return PreferredCategory {
            category: category.to_string(),
            source: PreferenceSource::CurrentProduct,
        };
    }

    let categories = catalog.known_categories();
    if let Some(category) = categories.get(rng.pick_index(categories.len())) {
        return PreferredCategory {
            category: category.to_string(),
            source: PreferenceSource::Random,
        };
    }

    PreferredCategory {
        category: UNCATEGORIZED.to_string(),
        source: PreferenceSource::Fallback,
    }
}
