pub mod api;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::IntoResponse;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let state = Arc::new(state);

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // The deadline bounds the whole request, store waits included; a
    // stalled data layer surfaces as the taxonomy's timeout, never a hang
    // or a bare status line.
    let deadline = middleware::from_fn(move |req: Request, next: Next| async move {
        match tokio::time::timeout(timeout, next.run(req)).await {
            Ok(response) => response,
            Err(_) => ApiError::Timeout.into_response(),
        }
    });

    api::build_api_routes(state)
        .layer(cors)
        .layer(deadline)
        .layer(TraceLayer::new_for_http())
}
