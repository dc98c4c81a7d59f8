use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use kedubak_common::models::auth::Claims;
use kedubak_common::models::user::User;
use kedubak_store::UserStore;
use thiserror::Error;

use crate::error::ApiError;

/// Token validation failure taxonomy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("token expired")]
    TokenExpired,
    #[error("malformed token")]
    TokenMalformed,
    #[error("token has no subject")]
    SubjectMissing,
}

/// Hash a password using argon2id with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Check a submitted email/password pair against the stored account.
///
/// Unknown email and wrong password are indistinguishable to the caller;
/// the difference only shows up in debug logs.
pub async fn verify_credentials(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    let Some(user) = users.find_by_email(email).await? else {
        tracing::debug!("login attempt for unknown email");
        return Err(ApiError::InvalidCredentials);
    };
    if !verify_password(password, &user.password_hash)? {
        tracing::debug!("login attempt with wrong password");
        return Err(ApiError::InvalidCredentials);
    }
    Ok(user)
}

/// A signed access token together with the expiry embedded in its claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expiry: DateTime<Utc>,
}

/// Issue an access token with `sub = email`, signed with the process-wide
/// secret.
pub fn create_access_token(email: &str, secret: &str, ttl_hours: i64) -> Result<IssuedToken> {
    let now = Utc::now();
    let expiry = now + Duration::hours(ttl_hours);
    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to create access token")?;
    Ok(IssuedToken { token, expiry })
}

/// Validate an access token and return its claims. Expiry is checked with
/// zero leeway; a token is invalid strictly after `exp`.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenMalformed,
    })?;
    if data.claims.sub.is_empty() {
        return Err(AuthError::SubjectMissing);
    }
    Ok(data.claims)
}
