use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    routes::AppState,
    services::{catalog, Recommendations},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// String or number; numbers are read as their decimal form like history ids
    #[serde(deserialize_with = "product_id_from_string_or_number")]
    pub current_product_id: String,
    /// Raw entries; malformed ones are skipped during analysis
    #[serde(default)]
    pub history: Option<Vec<Value>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProductIdInput {
    Text(String),
    Number(Number),
}

fn product_id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ProductIdInput::deserialize(deserializer)? {
        ProductIdInput::Text(id) => id,
        ProductIdInput::Number(id) => id.to_string(),
    })
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<Recommendations>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::info!(
            request_id = %request_id,
            reason = %rejection.body_text(),
            "Rejected recommendation request"
        );
        AppError::InvalidInput(rejection.body_text())
    })?;
    let history = request.history.unwrap_or_default();

    tracing::info!(
        request_id = %request_id,
        current_product_id = %request.current_product_id,
        history_len = history.len(),
        "Processing recommendation request"
    );

    let catalog = catalog::load_catalog(state.catalog_provider.as_ref(), state.catalog_limit).await;

    let mut rng = (state.random_source)();
    let response = state.recommender.recommend(
        &catalog,
        &request.current_product_id,
        &history,
        rng.as_mut(),
    )?;

    tracing::info!(
        request_id = %request_id,
        catalog_size = catalog.len(),
        returned = response.recommendations.len(),
        "Recommendations generated"
    );

    Ok(Json(response))
}
