/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/token` - Login with an OAuth2 password form
/// - `POST /auth/refresh_token` - Exchange a valid token for a fresh one

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::FormRejection, State},
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};
use taskflow_shared::auth::{
    jwt::{create_token, Claims},
    middleware::{authenticate, AuthContext},
};

/// OAuth2 password grant form
///
/// `username` carries the user's email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

impl TokenResponse {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

fn issue_token(state: &AppState, email: &str) -> ApiResult<TokenResponse> {
    let claims = Claims::new(email, state.token_lifetime());
    let token = create_token(&claims, state.jwt_secret())?;

    Ok(TokenResponse::bearer(token))
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /auth/token
/// Content-Type: application/x-www-form-urlencoded
///
/// username=mari@example.com&password=secret1
/// ```
///
/// # Response
///
/// ```json
/// {
///   "access_token": "eyJ...",
///   "token_type": "bearer"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Incorrect email or password
/// - `422 Unprocessable Entity`: Malformed form
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Form(form) = form?;

    let user = authenticate(&state.db, &form.username, &form.password).await?;
    let response = issue_token(&state, &user.email)?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(response))
}

/// Token refresh endpoint
///
/// The presented token must still be valid; the new one gets a full lifetime.
pub async fn refresh_token(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<TokenResponse>> {
    let response = issue_token(&state, &auth.email)?;

    tracing::debug!(user_id = auth.user_id, "Access token refreshed");
    Ok(Json(response))
}
