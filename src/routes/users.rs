/// User Routes
///
/// Account creation and credential updates.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, AuthenticatedUser};
use crate::error::{AppError, ErrorContext};
use crate::store::{User, UserStore};
use crate::validators::is_valid_email;

/// Email and password pair used to create or update an account
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user; never includes the password hash
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email.clone(),
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

/// POST /api/users
///
/// # Errors
/// - 400: Invalid email or empty password
/// - 409: Email already registered
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let email = is_valid_email(&form.email)?;
    let hashed_password = hash_password(&form.password)?;

    let user = users
        .insert_user(&email, &hashed_password)
        .await
        .map_err(|e| {
            let error = AppError::from(e);
            context.log_error(&error);
            error
        })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User registered successfully"
    );

    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// PUT /api/users
///
/// Replace the caller's email and password.
/// **Requires valid JWT access token** in Authorization header.
pub async fn update_user(
    caller: AuthenticatedUser,
    form: web::Json<CredentialsRequest>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_update").with_user_id(caller.user_id.to_string());

    let email = is_valid_email(&form.email)?;
    let hashed_password = hash_password(&form.password)?;

    let user = users
        .update_user(caller.user_id, &email, &hashed_password)
        .await?
        .ok_or_else(|| {
            let error = AppError::NotFound("user".to_string());
            context.log_error(&error);
            error
        })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User credentials updated"
    );

    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}
