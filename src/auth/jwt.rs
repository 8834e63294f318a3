/// JWT Token Generation and Validation
///
/// Access tokens are HS256-signed JWTs. Validation checks the declared
/// algorithm before any MAC work so that `none` or asymmetric headers can
/// never be used to steer verification.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::error::AuthError;

/// Upper bound on access token lifetime, in seconds
pub const MAX_ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;

const EXPECTED_ALGORITHM: &str = "HS256";

/// Clamp a requested lifetime to `(0, MAX_ACCESS_TOKEN_TTL_SECONDS]`.
///
/// Missing, non-positive and oversized requests all get the ceiling.
pub fn clamp_access_token_ttl(requested_seconds: Option<i64>) -> Duration {
    let seconds = match requested_seconds {
        Some(s) if s > 0 && s <= MAX_ACCESS_TOKEN_TTL_SECONDS => s,
        _ => MAX_ACCESS_TOKEN_TTL_SECONDS,
    };
    Duration::seconds(seconds)
}

/// Generate a new access token for a user
///
/// `ttl` is used as given; clamp it with [`clamp_access_token_ttl`] first.
///
/// # Errors
/// Returns `Internal` if signing fails
pub fn issue_access_token(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, AuthError> {
    issue_access_token_at(user_id, secret, ttl, Utc::now())
}

/// [`issue_access_token`] with an explicit issue time
pub fn issue_access_token_at(
    user_id: Uuid,
    secret: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = Claims::new(user_id, now, ttl);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate an access token and return the user it was issued to
///
/// # Errors
/// `Malformed`, `AlgorithmMismatch`, `SignatureInvalid`, `Expired` or
/// `SubjectInvalid`, checked in that order
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    validate_access_token_at(token, secret, Utc::now())
}

/// [`validate_access_token`] against an explicit clock reading
pub fn validate_access_token_at(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<Uuid, AuthError> {
    let algorithm = declared_algorithm(token)?;
    if algorithm != EXPECTED_ALGORITHM {
        tracing::warn!(algorithm = %algorithm, "Rejected access token with unexpected algorithm");
        return Err(AuthError::AlgorithmMismatch);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below against `now`, with no leeway.
    validation.validate_exp = false;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => AuthError::SignatureInvalid,
        ErrorKind::InvalidAlgorithm => AuthError::AlgorithmMismatch,
        _ => {
            tracing::debug!("JWT decoding error: {}", e);
            AuthError::Malformed
        }
    })?;

    if claims.is_expired_at(now) {
        return Err(AuthError::Expired);
    }

    claims.user_id()
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Read the `alg` field of a compact JWT without trusting anything else in it.
fn declared_algorithm(token: &str) -> Result<String, AuthError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| AuthError::Malformed)?;
    let header: RawHeader = serde_json::from_slice(&bytes).map_err(|_| AuthError::Malformed)?;

    Ok(header.alg)
}
