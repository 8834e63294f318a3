/// JWT Claims structure
///
/// Registered claims only (RFC 7519). The subject is the user's UUID.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Fixed `iss` value for every access token this service mints
pub const ISSUER: &str = "chirpy";

/// JWT Claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build claims for `user_id` issued at `now`, valid for `ttl`
    pub fn new(user_id: Uuid, now: DateTime<Utc>, ttl: Duration) -> Self {
        let iat = now.timestamp();
        Self {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat,
            exp: iat + ttl.num_seconds(),
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns `SubjectInvalid` if `sub` is not a UUID
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::SubjectInvalid)
    }

    /// A token is still good at the exact instant it expires, and not a
    /// moment after. An `exp` outside chrono's range counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match DateTime::<Utc>::from_timestamp(self.exp, 0) {
            Some(expires_at) => now > expires_at,
            None => true,
        }
    }
}
