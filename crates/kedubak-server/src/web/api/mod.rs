pub mod auth;
pub mod middleware;
pub mod posts;
pub mod users;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::AppState;

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Public auth routes
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // Account self-service
        .route("/user/me", get(users::me))
        .route("/edit", put(users::edit))
        .route("/remove", delete(users::remove))
        // Feed routes
        .route("/post", get(posts::list).post(posts::create))
        .route(
            "/post/{id}",
            get(posts::get).put(posts::update).delete(posts::remove),
        )
        .route("/post/{id}/vote", post(posts::vote))
        .route("/post/{id}/comment", post(posts::comment))
        .with_state(state)
}
