use std::sync::Arc;

use axum::extract::State;
use kedubak_common::models::user::{User, UserPatch};
use kedubak_common::validation::{validate_email, validate_non_empty, validate_password};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::hash_password;
use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::{CurrentUser, Json};

#[derive(Debug, Deserialize)]
pub struct EditUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

impl EditUserRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(email) = &self.email {
            validate_email(email).map_err(ApiError::validation)?;
        }
        if let Some(first_name) = &self.first_name {
            validate_non_empty("first_name", first_name).map_err(ApiError::validation)?;
        }
        if let Some(last_name) = &self.last_name {
            validate_non_empty("last_name", last_name).map_err(ApiError::validation)?;
        }
        if let Some(password) = &self.password {
            validate_password(password).map_err(ApiError::validation)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveUserRequest {
    pub email: String,
}

/// GET /user/me
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// PUT /edit -- partial self-service update; absent fields stay untouched
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn edit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<EditUserRequest>,
) -> Result<Json<User>, ApiError> {
    req.validate()?;

    let password_hash = match &req.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };
    let patch = UserPatch {
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
        password_hash,
    };

    match state.users.update(&user.email, patch).await? {
        Some(updated) => Ok(Json(updated)),
        // Resolved a moment ago but gone now
        None => Err(ApiError::IdentityNotFound),
    }
}

/// DELETE /remove -- an account can only remove itself
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<RemoveUserRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.email != user.email {
        return Err(ApiError::Forbidden);
    }

    if !state.users.delete_by_email(&req.email).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(user_id = %user.id, "user removed their account");
    Ok(Json(json!({ "removed": true, "email": req.email })))
}
