/// Refresh Token Management
///
/// Refresh tokens are:
/// - 32 bytes from the OS RNG, hex-encoded (64 lowercase characters)
/// - Valid for 60 days from creation
/// - Reusable until they expire or are revoked (no rotation on use)
/// - Never deleted on revocation; the record stays as an audit trail
///
/// Expiry is not stored: a token is expired whenever `now > expires_at`.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AuthError;
use crate::store::RefreshTokenStore;

/// Lifetime of a refresh token, in days
pub const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 60;

const TOKEN_BYTES: usize = 32;

/// A refresh token record as persisted
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Generate a new cryptographically secure refresh token value
///
/// # Errors
/// Returns `Internal` if the OS random source fails
pub fn generate_refresh_token() -> Result<String, AuthError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::Internal(format!("Random source failed: {}", e)))?;
    Ok(hex::encode(bytes))
}

/// State machine over persisted refresh tokens
///
/// Active -> Revoked on explicit `revoke`; Active -> Expired with time.
#[derive(Clone)]
pub struct RefreshTokenLedger {
    store: Arc<dyn RefreshTokenStore>,
}

impl RefreshTokenLedger {
    pub fn new(store: Arc<dyn RefreshTokenStore>) -> Self {
        Self { store }
    }

    /// Mint and persist a fresh token for `user_id`
    pub async fn create(&self, user_id: Uuid) -> Result<RefreshToken, AuthError> {
        self.create_at(user_id, Utc::now()).await
    }

    /// [`RefreshTokenLedger::create`] with an explicit creation time
    pub async fn create_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<RefreshToken, AuthError> {
        let record = RefreshToken {
            token: generate_refresh_token()?,
            user_id,
            created_at: now,
            expires_at: now + Duration::days(REFRESH_TOKEN_LIFETIME_DAYS),
            revoked_at: None,
        };

        self.store.insert_refresh_token(&record).await?;

        tracing::info!(user_id = %user_id, "Refresh token created");
        Ok(record)
    }

    /// Look a token up without judging it
    ///
    /// # Errors
    /// `NotFound` for an unknown token, `Internal` on store failure
    pub async fn resolve(&self, token: &str) -> Result<RefreshToken, AuthError> {
        self.store
            .find_refresh_token(token)
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Check that a token may mint an access token and return its owner
    ///
    /// Does not modify the record.
    pub async fn validate_for_use(&self, token: &str) -> Result<Uuid, AuthError> {
        self.validate_for_use_at(token, Utc::now()).await
    }

    /// [`RefreshTokenLedger::validate_for_use`] against an explicit clock reading
    ///
    /// # Errors
    /// `NotFound`, then `Revoked`, then `Expired`
    pub async fn validate_for_use_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Uuid, AuthError> {
        let record = self.resolve(token).await?;

        if record.is_revoked() {
            tracing::warn!(user_id = %record.user_id, "Attempt to use revoked refresh token");
            return Err(AuthError::Revoked);
        }

        if record.is_expired_at(now) {
            tracing::info!(user_id = %record.user_id, "Refresh token expired");
            return Err(AuthError::Expired);
        }

        Ok(record.user_id)
    }

    /// Revoke a token. Revoking twice is fine; the first timestamp sticks.
    ///
    /// # Errors
    /// `NotFound` for an unknown token, `Internal` on store failure
    pub async fn revoke(&self, token: &str) -> Result<RefreshToken, AuthError> {
        self.revoke_at(token, Utc::now()).await
    }

    /// [`RefreshTokenLedger::revoke`] with an explicit revocation time
    pub async fn revoke_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshToken, AuthError> {
        let record = self
            .store
            .revoke_refresh_token(token, now)
            .await?
            .ok_or(AuthError::NotFound)?;

        tracing::info!(user_id = %record.user_id, "Refresh token revoked");
        Ok(record)
    }
}
