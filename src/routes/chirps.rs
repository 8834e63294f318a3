/// Chirp Routes
///
/// Posting, listing, fetching and deleting chirps. Only the author may
/// delete a chirp.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{authorize_mutation, AuthenticatedUser};
use crate::error::{AppError, ErrorContext, ValidationError};
use crate::store::{Chirp, ChirpStore};
use crate::validators::clean_chirp_body;

#[derive(Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

#[derive(Serialize)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl From<Chirp> for ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

#[derive(Deserialize)]
pub struct ListChirpsQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

fn parse_id(raw: &str, field: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ValidationError::InvalidFormat(field.to_string()))
}

/// POST /api/chirps
///
/// **Requires valid JWT access token.** The author is always the caller.
///
/// # Errors
/// - 400: Body longer than 140 characters
/// - 401: Missing or invalid access token
pub async fn create_chirp(
    caller: AuthenticatedUser,
    form: web::Json<CreateChirpRequest>,
    chirps: web::Data<dyn ChirpStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("chirp_create").with_user_id(caller.user_id.to_string());

    let body = clean_chirp_body(&form.body)?;
    let chirp = chirps.insert_chirp(caller.user_id, &body).await.map_err(|e| {
        let error = AppError::from(e);
        context.log_error(&error);
        error
    })?;

    tracing::info!(
        request_id = %context.request_id,
        chirp_id = %chirp.id,
        "Chirp created"
    );

    Ok(HttpResponse::Created().json(ChirpResponse::from(chirp)))
}

/// GET /api/chirps?author_id=<uuid>&sort=asc|desc
///
/// Chirps ordered by creation time, oldest first unless `sort=desc`.
pub async fn list_chirps(
    query: web::Query<ListChirpsQuery>,
    chirps: web::Data<dyn ChirpStore>,
) -> Result<HttpResponse, AppError> {
    let author_id = match query.author_id.as_deref() {
        Some(raw) if !raw.is_empty() => Some(parse_id(raw, "author_id")?),
        _ => None,
    };

    let mut listed = chirps.list_chirps(author_id).await?;
    if query.sort.as_deref() == Some("desc") {
        listed.reverse();
    }

    let response: Vec<ChirpResponse> = listed.into_iter().map(ChirpResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    path: web::Path<String>,
    chirps: web::Data<dyn ChirpStore>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_id(&path, "chirp_id")?;

    let chirp = chirps
        .find_chirp(chirp_id)
        .await?
        .ok_or_else(|| AppError::NotFound("chirp".to_string()))?;

    Ok(HttpResponse::Ok().json(ChirpResponse::from(chirp)))
}

/// DELETE /api/chirps/{chirp_id}
///
/// # Errors
/// - 401: Missing or invalid access token
/// - 403: Caller is not the author
/// - 404: No such chirp
pub async fn delete_chirp(
    caller: AuthenticatedUser,
    path: web::Path<String>,
    chirps: web::Data<dyn ChirpStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("chirp_delete").with_user_id(caller.user_id.to_string());
    let chirp_id = parse_id(&path, "chirp_id")?;

    let existing = chirps.find_chirp(chirp_id).await?;
    let chirp = authorize_mutation(caller.user_id, existing).map_err(|e| {
        let error = AppError::from(e);
        context.log_error(&error);
        error
    })?;

    // Lost a race with another delete; the chirp is gone either way.
    if !chirps.delete_chirp(chirp.id).await? {
        return Err(AppError::NotFound("chirp".to_string()));
    }

    tracing::info!(
        request_id = %context.request_id,
        chirp_id = %chirp.id,
        "Chirp deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert_eq!(
            parse_id("not-a-uuid", "author_id"),
            Err(ValidationError::InvalidFormat("author_id".to_string()))
        );
    }

    #[test]
    fn test_parse_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "chirp_id"), Ok(id));
    }
}
