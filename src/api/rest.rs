// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// The route names and every response field name are a frozen external
// contract; dashboards and downstream agents parse them verbatim. CORS is
// configured permissively for development; tighten `allowed_origins` in
// production.
// =============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::app_state::AppState;
use crate::error::{ApiError, Result};
use crate::pipeline;
use crate::sentiment::SentimentReport;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/explain", post(explain))
        .route("/predict_stock", post(predict_stock))
        .route("/news_sentiment", post(news_sentiment))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Root — liveness plus the effective feature schema
// =============================================================================

async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "running",
        "expected_features": state.schema,
    }))
}

// =============================================================================
// POST /explain — rank attributions for caller-supplied features
// =============================================================================

async fn explain(
    State(state): State<Arc<AppState>>,
    Json(features): Json<HashMap<String, f64>>,
) -> Result<impl IntoResponse> {
    let out = pipeline::explain_features(&state, &features).await?;
    Ok(Json(out))
}

// =============================================================================
// POST /predict_stock — symbol to directional verdict
// =============================================================================

async fn predict_stock(
    State(state): State<Arc<AppState>>,
    Json(req): Json<serde_json::Value>,
) -> Result<impl IntoResponse> {
    let symbol = required_symbol(&req)?;
    let out = pipeline::predict_symbol(&state, &symbol).await?;
    Ok(Json(out))
}

// =============================================================================
// POST /news_sentiment — windowed news aggregation
// =============================================================================

async fn news_sentiment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<serde_json::Value>,
) -> Result<impl IntoResponse> {
    let symbol = required_symbol(&req)?.to_uppercase();
    let report = pipeline::news_sentiment(&state, &symbol).await?;

    // Two historical wire shapes: the no-data variant reports under
    // `overall_sentiment` with a message, the data variant under
    // `summary_sentiment` with the window dates.
    let body = match report {
        SentimentReport::NoData { message, summary } => json!({
            "symbol": symbol,
            "message": message,
            "articles": [],
            "daily_avg_sentiment": [],
            "overall_sentiment": summary,
        }),
        SentimentReport::Data {
            from_date,
            to_date,
            daily,
            articles,
            summary,
        } => json!({
            "symbol": symbol,
            "summary_sentiment": summary,
            "from_date": from_date.to_string(),
            "to_date": to_date.to_string(),
            "daily_avg_sentiment": daily,
            "articles": articles,
        }),
    };

    Ok(Json(body))
}

// =============================================================================
// Helpers
// =============================================================================

/// Extract the required `symbol` field from a JSON request body.
fn required_symbol(req: &serde_json::Value) -> Result<String> {
    req.get("symbol")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| ApiError::MissingField("symbol".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_symbol_present() {
        let req = json!({ "symbol": "AAPL" });
        assert_eq!(required_symbol(&req).unwrap(), "AAPL");
    }

    #[test]
    fn required_symbol_absent_or_wrong_type() {
        assert!(matches!(
            required_symbol(&json!({})),
            Err(ApiError::MissingField(f)) if f == "symbol"
        ));
        assert!(matches!(
            required_symbol(&json!({ "symbol": 42 })),
            Err(ApiError::MissingField(_))
        ));
    }
}
