use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: StoreHealth,
}

#[derive(Serialize)]
pub struct StoreHealth {
    pub backend: String,
    pub status: String,
}

/// Health check endpoint - public
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let store_result = state.drinks.health_check().await;

    let (status, store_status, status_code) = match &store_result {
        Ok(()) => ("healthy", "ok", StatusCode::OK),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            ("unhealthy", "error", StatusCode::SERVICE_UNAVAILABLE)
        }
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: StoreHealth {
                backend: state.drinks.backend_name().to_string(),
                status: store_status.to_string(),
            },
        }),
    )
}
