/// Payment provider webhooks
///
/// Polka calls this endpoint with `Authorization: ApiKey <key>` when a
/// user's subscription changes.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{extract_from_headers, CredentialScheme};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError, ValidationError};
use crate::store::UserStore;

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct PolkaWebhook {
    pub event: String,
    #[serde(default)]
    pub data: PolkaWebhookData,
}

#[derive(Deserialize, Default)]
pub struct PolkaWebhookData {
    #[serde(default)]
    pub user_id: String,
}

/// POST /api/polka/webhooks
///
/// The API key is checked before the body is read. Events other than
/// `user.upgraded` are acknowledged and ignored.
///
/// # Errors
/// - 400: Body is not a webhook payload, or `user_id` is not a UUID
/// - 401: Missing or wrong API key
/// - 404: No such user
pub async fn polka_webhook(
    req: HttpRequest,
    body: web::Bytes,
    users: web::Data<dyn UserStore>,
    auth: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let key = extract_from_headers(req.headers(), CredentialScheme::ApiKey)?;
    if key != auth.polka_key {
        tracing::warn!("Webhook rejected: API key mismatch");
        return Err(AuthError::AuthenticationFailed.into());
    }

    let payload: PolkaWebhook = serde_json::from_slice(&body)
        .map_err(|_| ValidationError::InvalidFormat("webhook payload".to_string()))?;

    if payload.event != USER_UPGRADED {
        tracing::debug!(event = %payload.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = Uuid::parse_str(payload.data.user_id.trim())
        .map_err(|_| ValidationError::InvalidFormat("user_id".to_string()))?;

    if !users.upgrade_to_chirpy_red(user_id).await? {
        return Err(AppError::NotFound("user".to_string()));
    }

    tracing::info!(user_id = %user_id, "User upgraded to Chirpy Red");
    Ok(HttpResponse::NoContent().finish())
}
