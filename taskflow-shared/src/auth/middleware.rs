/// Request authentication primitives for Axum
///
/// The API's JWT layer uses these helpers to turn an
/// `Authorization: Bearer <token>` header into an [`AuthContext`]:
///
/// 1. [`bearer_token`] extracts the token from the headers
/// 2. [`resolve_user`] validates it and loads the user named by its subject
///
/// Every failure in that chain is an [`AuthError`]. Callers are expected to
/// collapse all of them (except storage failures) into one generic
/// "Could not validate credentials" response, so clients cannot tell an
/// expired token from a forged one.
///
/// # Request Extensions
///
/// After successful authentication the layer adds an `AuthContext`, which
/// handlers extract with `Extension<AuthContext>`.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskflow_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} <{}>", auth.user_id, auth.email)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use super::jwt::{validate_token, JwtError};
use super::password::{verify_password, PasswordError};
use crate::models::user::User;

/// Authentication context added to request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i64,

    /// Email the token was issued for
    pub email: String,
}

impl AuthContext {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Error type for request and login authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not `Bearer <token>`
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token signature, issuer or expiry check failed
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    /// Token is valid but names no existing user
    #[error("Token subject does not match any user")]
    UnknownSubject,

    /// Login with a wrong email or password
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Stored password hash could not be checked
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AuthError {
    /// True for failures that are the server's fault rather than the client's
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::Password(_) | AuthError::Database(_))
    }
}

/// Extracts the bearer token from the `Authorization` header
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Header is not valid ASCII".to_string()))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AuthError::InvalidFormat("Expected Bearer token".to_string()));
    }

    Ok(token.trim())
}

/// Resolves a bearer token to the user it was issued for
///
/// Verifies signature and issuer, rejects expired tokens, then looks the
/// user up by the email in `sub`.
pub async fn resolve_user(pool: &SqlitePool, token: &str, secret: &str) -> Result<User, AuthError> {
    let claims = validate_token(token, secret)?;

    let user = User::find_by_email(pool, &claims.sub)
        .await?
        .ok_or(AuthError::UnknownSubject)?;

    debug!(user_id = user.id, "Bearer token resolved");
    Ok(user)
}

/// Checks an email/password pair, as submitted to the login endpoint
pub async fn authenticate(pool: &SqlitePool, email: &str, password: &str) -> Result<User, AuthError> {
    let user = User::find_by_email(pool, email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &user.password)? {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(user)
}
