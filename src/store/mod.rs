/// Persistence contracts
///
/// Handlers and the refresh token ledger only see these traits. `PgStore`
/// backs them with Postgres, `MemoryStore` keeps everything in process.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{OwnedResource, RefreshToken};
use crate::error::StoreError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub is_chirpy_red: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Chirp {
    pub id: Uuid,
    pub body: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedResource for Chirp {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `UniqueViolation` if the email is taken.
    async fn insert_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Returns `None` if there is no such user.
    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Returns `false` if there is no such user.
    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Deletes every user. Their chirps and refresh tokens go with them.
    async fn delete_all_users(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn insert_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, StoreError>;

    /// Oldest first, optionally restricted to one author.
    async fn list_chirps(&self, author_id: Option<Uuid>) -> Result<Vec<Chirp>, StoreError>;

    async fn find_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StoreError>;

    /// Returns `false` if nothing was deleted.
    async fn delete_chirp(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn insert_refresh_token(&self, record: &RefreshToken) -> Result<(), StoreError>;

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError>;

    /// Set `revoked_at` to `at` unless it is already set, as one atomic step.
    ///
    /// Returns the record as stored afterwards, or `None` for an unknown token.
    async fn revoke_refresh_token(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, StoreError>;
}

/// The three stores the application runs against
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub chirps: Arc<dyn ChirpStore>,
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            users: store.clone(),
            chirps: store.clone(),
            refresh_tokens: store,
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            chirps: store.clone(),
            refresh_tokens: store,
        }
    }
}
