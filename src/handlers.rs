use crate::config::Config;
use crate::dataset::DatasetSummary;
use crate::encoder;
use crate::errors::AppError;
use crate::models::{format_premium, QuoteRequest, QuoteResponse, QuoteSchema};
use crate::regressor::PremiumRegressor;
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use moka::future::Cache;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
///
/// The loaded model is the one process-wide mutable-looking resource, and it
/// never mutates: it is built once in `main` and shared read-only.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// The pre-trained premium model, loaded once at startup.
    pub regressor: Arc<PremiumRegressor>,
    /// Summary of the reference dataset, when the file was present.
    pub dataset: Option<DatasetSummary>,
    /// Memoizes predictions for identical encoded rows.
    /// Key: encoded row rendered as a string, Value: raw model output.
    pub quote_cache: Cache<String, f64>,
}

/// Health check endpoint.
///
/// Returns the service status, version, and model information.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy"))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-premium-api",
            "version": "0.1.0",
            "model": {
                "path": state.regressor.path().display().to_string(),
                "fingerprint": state.regressor.fingerprint(),
                "trees": state.regressor.tree_count(),
            },
            "reference_dataset_rows": state.dataset.as_ref().map(|d| d.rows),
        })),
    )
}

/// GET /api/v1/schema
///
/// Describes the quote form's input surface: numeric field domains and
/// categorical options, built from the same constants the validator uses.
///
/// # Returns
///
/// * `Json<QuoteSchema>` - The field domains and options.
#[utoipa::path(
    get,
    path = "/api/v1/schema",
    responses((status = 200, description = "Quote form field domains", body = QuoteSchema))
)]
pub async fn quote_schema() -> Json<QuoteSchema> {
    Json(QuoteSchema::current())
}

/// POST /api/v1/quote
///
/// Predicts the insurance premium for one submitted set of customer
/// attributes. Each submission is independent: validate, encode, invoke the
/// model, format, respond.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - JSON body with the seven customer attributes.
///
/// # Returns
///
/// * `Result<Json<QuoteResponse>, AppError>` - The predicted premium or an error.
#[utoipa::path(
    post,
    path = "/api/v1/quote",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Predicted premium", body = QuoteResponse),
        (status = 400, description = "A field is outside its documented domain"),
        (status = 500, description = "The model failed to produce a prediction"),
    )
)]
pub async fn predict_quote(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    tracing::info!("POST /api/v1/quote - request: {:?}", request);

    request.validate()?;

    let row = encoder::encode(&request);
    let cache_key = row
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("|");

    let premium = match state.quote_cache.get(&cache_key).await {
        Some(cached) => {
            tracing::debug!("Quote cache hit for row {}", cache_key);
            cached
        }
        None => {
            let predicted = state.regressor.predict(&row)?;
            state.quote_cache.insert(cache_key, predicted).await;
            predicted
        }
    };

    tracing::info!("Predicted premium: {}", format_premium(premium));

    Ok(Json(QuoteResponse {
        premium,
        formatted: format_premium(premium),
        model_fingerprint: state.regressor.fingerprint().to_string(),
        generated_at: Utc::now(),
    }))
}
