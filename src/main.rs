mod config;
mod dataset;
mod encoder;
mod errors;
mod handlers;
mod models;
mod regressor;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::dataset::DatasetSummary;
use crate::regressor::PremiumRegressor;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::quote_schema,
        handlers::predict_quote,
    ),
    components(schemas(
        models::QuoteRequest,
        models::QuoteResponse,
        models::QuoteSchema,
        models::NumericFieldSpec,
        models::CategoricalFieldSpec,
        models::Gender,
        models::PolicyType,
    )),
    info(
        title = "Insurance Premium Quote API",
        description = "Predicts an insurance premium from seven customer attributes."
    )
)]
struct ApiDoc;

/// Serves the quote form page.
///
/// A single page with five bounded sliders and two closed-choice selectors;
/// the submit action posts to `/api/v1/quote` and renders the formatted
/// premium or an inline failure message, leaving the form usable for retry.
///
/// # Returns
///
/// * `impl IntoResponse` - The HTTP response containing the form HTML.
async fn serve_quote_form() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Insurance Premium Prediction</title>
    <style>
        body { background-color: #f4f9fd; font-family: Arial, sans-serif; margin: 0; padding: 2rem; }
        h1, h2, h3, h4 { color: #003366; }
        .container { max-width: 900px; margin: 0 auto; }
        .columns { display: flex; gap: 2rem; flex-wrap: wrap; }
        .column { flex: 1; min-width: 280px; }
        .field { margin-bottom: 1.25rem; }
        .field label { display: block; color: #003366; font-weight: bold; margin-bottom: 0.25rem; }
        .field input[type=range] { width: 100%; }
        .field select { width: 100%; padding: 0.35rem; }
        .field .value { color: #003366; }
        button { background-color: #ff3333; color: white; border: none; border-radius: 5px; padding: 0.6rem 1.5rem; font-size: 1rem; cursor: pointer; }
        button:hover { background-color: #cc2900; }
        #result { margin-top: 1.5rem; padding: 1rem; border-radius: 5px; display: none; }
        #result.success { display: block; background-color: #d4edda; color: #155724; }
        #result.error { display: block; background-color: #f8d7da; color: #721c24; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Insurance Premium Prediction</h1>
        <p>Enter customer details below to predict the insurance premium.</p>
        <div class="columns">
            <div class="column">
                <div class="field">
                    <label for="age">Age: <span class="value" id="age-value">30</span></label>
                    <input type="range" id="age" min="18" max="100" value="30">
                </div>
                <div class="field">
                    <label for="annual_income">Annual Income: <span class="value" id="annual_income-value">50000</span></label>
                    <input type="range" id="annual_income" min="10000" max="200000" value="50000">
                </div>
                <div class="field">
                    <label for="credit_score">Credit Score: <span class="value" id="credit_score-value">700</span></label>
                    <input type="range" id="credit_score" min="300" max="850" value="700">
                </div>
                <div class="field">
                    <label for="gender">Gender</label>
                    <select id="gender">
                        <option>Male</option>
                        <option>Female</option>
                        <option>Other</option>
                    </select>
                </div>
            </div>
            <div class="column">
                <div class="field">
                    <label for="health_score">Health Score: <span class="value" id="health_score-value">70</span></label>
                    <input type="range" id="health_score" min="0" max="100" value="70">
                </div>
                <div class="field">
                    <label for="policy_type">Policy Type</label>
                    <select id="policy_type">
                        <option>Type 1</option>
                        <option>Type 2</option>
                        <option>Type 3</option>
                    </select>
                </div>
                <div class="field">
                    <label for="insurance_duration">Insurance Duration (in years): <span class="value" id="insurance_duration-value">5</span></label>
                    <input type="range" id="insurance_duration" min="1" max="30" value="5">
                </div>
            </div>
        </div>
        <button id="predict">Predict Premium</button>
        <div id="result"></div>
    </div>
    <script>
        const sliders = ["age", "annual_income", "credit_score", "health_score", "insurance_duration"];
        for (const id of sliders) {
            const input = document.getElementById(id);
            const value = document.getElementById(id + "-value");
            input.addEventListener("input", () => { value.textContent = input.value; });
        }

        const result = document.getElementById("result");
        document.getElementById("predict").addEventListener("click", async () => {
            const body = {
                age: parseInt(document.getElementById("age").value, 10),
                gender: document.getElementById("gender").value,
                annual_income: parseInt(document.getElementById("annual_income").value, 10),
                credit_score: parseInt(document.getElementById("credit_score").value, 10),
                insurance_duration: parseInt(document.getElementById("insurance_duration").value, 10),
                health_score: parseInt(document.getElementById("health_score").value, 10),
                policy_type: document.getElementById("policy_type").value,
            };
            try {
                const response = await fetch("/api/v1/quote", {
                    method: "POST",
                    headers: { "Content-Type": "application/json" },
                    body: JSON.stringify(body),
                });
                const payload = await response.json();
                if (response.ok) {
                    result.className = "success";
                    result.textContent = "Predicted Premium: " + payload.formatted;
                } else {
                    result.className = "error";
                    result.textContent = payload.error || "Prediction failed";
                }
            } catch (e) {
                result.className = "error";
                result.textContent = "Prediction failed: " + e;
            }
        });
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - The model artifact (fail fast when absent).
/// - The reference dataset summary.
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server runs successfully, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_premium_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Load the model artifact before accepting any input. A missing or
    // malformed artifact halts startup with the failing path in the message.
    let regressor = Arc::new(PremiumRegressor::load(&config.model_path)?);
    regressor.ensure_feature_order(&encoder::FEATURE_COLUMNS)?;
    tracing::info!(
        "Premium model ready: {} trees, fingerprint {}",
        regressor.tree_count(),
        &regressor.fingerprint()[..12]
    );

    // Summarize the reference dataset. It is an inert artifact: absence is
    // logged, never fatal.
    let dataset = DatasetSummary::load_optional(&config.data_path);

    // Create quote memoization cache (1 hour TTL, 10k max entries).
    // The model is deterministic, so identical encoded rows can share a result.
    let quote_cache = Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(10_000)
        .build();
    tracing::info!("Quote cache initialized");

    // Build application state
    let app_state = Arc::new(handlers::AppState {
        config: config.clone(),
        regressor,
        dataset,
        quote_cache,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/v1/quote", post(handlers::predict_quote))
        .route("/api/v1/schema", get(handlers::quote_schema))
        .layer(
            ServiceBuilder::new()
                // Request size limit: quote payloads are a handful of fields
                .layer(RequestBodyLimitLayer::new(64 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with the form page and health check (health bypasses
    // rate limiting for deployment probes)
    let app = Router::new()
        .route("/", get(serve_quote_form))
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
