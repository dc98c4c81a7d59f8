use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use kedubak_common::models::user::User;
use kedubak_common::validation::{validate_email, validate_non_empty, validate_password};
use serde::{Deserialize, Serialize};

use crate::auth::{create_access_token, hash_password, verify_credentials};
use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::Json;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_email(&self.email).map_err(ApiError::validation)?;
        validate_non_empty("first_name", &self.first_name).map_err(ApiError::validation)?;
        validate_non_empty("last_name", &self.last_name).map_err(ApiError::validation)?;
        validate_password(&self.password).map_err(ApiError::validation)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expiry: DateTime<Utc>,
}

/// POST /auth/register
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    req.validate()?;

    let password_hash = hash_password(&req.password)?;
    let user = User::new(req.email, req.first_name, req.last_name, password_hash);
    let created = state.users.insert(user).await?;

    tracing::info!(user_id = %created.id, "registered new user");
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /auth/login
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = verify_credentials(state.users.as_ref(), &req.email, &req.password).await?;

    let auth = &state.config.auth;
    let issued = create_access_token(&user.email, &auth.jwt_secret, auth.token_ttl_hours)?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        token: issued.token,
        expiry: issued.expiry,
    }))
}
