pub mod drinks;
pub mod health;

use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;
use crate::error::ApiError;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Listing is public, every other drink route names a permission
        .route("/drinks", get(drinks::list_drinks).post(drinks::create_drink))
        .route("/drinks-detail", get(drinks::list_drinks_detail))
        .route(
            "/drinks/:drink_id",
            patch(drinks::update_drink).delete(drinks::delete_drink),
        )
        .fallback(not_found)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("resource not found".into())
}
