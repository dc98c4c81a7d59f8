use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
};
use kedubak_common::models::user::User;
use serde::Serialize;

use crate::auth::{validate_access_token, AuthError};
use crate::error::ApiError;
use crate::state::AppState;

/// Drop-in replacement for `axum::Json` whose parse failures go through the
/// API error envelope instead of axum's plain-text rejection.
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Extractor that resolves the bearer token to the current account.
///
/// A valid signature alone is not enough: the subject is re-loaded from the
/// store, so a token never outlives the account it was issued for. Required
/// by every protected handler; pure gate, no side effects.
#[derive(Debug)]
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|val| val.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthenticated(AuthError::MissingToken))?;

        let claims = validate_access_token(token, &state.config.auth.jwt_secret)?;

        match state.users.find_by_email(&claims.sub).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(ApiError::IdentityNotFound),
        }
    }
}
