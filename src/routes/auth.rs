/// Authentication Routes
///
/// Login, access token refresh and refresh token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{
    clamp_access_token_ttl, extract_from_headers, issue_access_token, verify_password,
    CredentialScheme, RefreshTokenLedger,
};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError, ErrorContext};
use crate::routes::users::UserResponse;
use crate::store::UserStore;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Requested access token lifetime; clamped to one hour
    pub expires_in_seconds: Option<i64>,
}

/// Login response: the user plus both tokens
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

/// Refresh response carrying a new access token
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// An unknown refresh token is just another bad credential to the client.
fn unknown_token_is_unauthorized(err: AuthError) -> AuthError {
    match err {
        AuthError::NotFound => AuthError::AuthenticationFailed,
        other => other,
    }
}

/// POST /api/login
///
/// # Errors
/// - 400: Missing fields
/// - 401: Unknown email or wrong password (indistinguishable)
/// - 500: Internal server error
pub async fn login(
    form: web::Json<LoginRequest>,
    users: web::Data<dyn UserStore>,
    ledger: web::Data<RefreshTokenLedger>,
    auth: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let user = match users.find_user_by_email(form.email.trim()).await? {
        Some(user) => user,
        None => {
            tracing::warn!(request_id = %context.request_id, "Login attempt for unknown email");
            return Err(AuthError::AuthenticationFailed.into());
        }
    };

    verify_password(&user.hashed_password, &form.password).map_err(|e| {
        tracing::warn!(request_id = %context.request_id, user_id = %user.id, "Password rejected");
        e
    })?;

    let ttl = clamp_access_token_ttl(
        form.expires_in_seconds
            .or(Some(auth.access_token_ttl_seconds)),
    );
    let token = issue_access_token(user.id, &auth.jwt_secret, ttl)?;
    let refresh_token = ledger.create(user.id).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: UserResponse::from(&user),
        token,
        refresh_token: refresh_token.token,
    }))
}

/// POST /api/refresh
///
/// Mint a new access token from the refresh token in `Authorization: Bearer`.
/// The refresh token itself is left untouched and can be used again.
///
/// # Errors
/// - 401: Missing, unknown, revoked or expired refresh token
pub async fn refresh(
    req: HttpRequest,
    ledger: web::Data<RefreshTokenLedger>,
    auth: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let presented = extract_from_headers(req.headers(), CredentialScheme::Bearer)?;
    let user_id = ledger
        .validate_for_use(&presented)
        .await
        .map_err(unknown_token_is_unauthorized)?;

    let ttl = clamp_access_token_ttl(Some(auth.access_token_ttl_seconds));
    let token = issue_access_token(user_id, &auth.jwt_secret, ttl)?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user_id,
        "Access token refreshed"
    );

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// POST /api/revoke
///
/// Revoke the refresh token in `Authorization: Bearer`. Repeating the call
/// for an already revoked token still answers 204.
///
/// # Errors
/// - 401: Missing or unknown refresh token
pub async fn revoke(
    req: HttpRequest,
    ledger: web::Data<RefreshTokenLedger>,
) -> Result<HttpResponse, AppError> {
    let presented = extract_from_headers(req.headers(), CredentialScheme::Bearer)?;
    ledger
        .revoke(&presented)
        .await
        .map_err(unknown_token_is_unauthorized)?;

    Ok(HttpResponse::NoContent().finish())
}
