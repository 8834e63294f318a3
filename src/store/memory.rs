use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Chirp, ChirpStore, RefreshTokenStore, User, UserStore};
use crate::auth::RefreshToken;
use crate::error::StoreError;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    // insertion order doubles as creation order
    chirps: Vec<Chirp>,
    refresh_tokens: HashMap<String, RefreshToken>,
}

/// In-process store with the same semantics as the Postgres schema:
/// unique emails, foreign keys to users, cascading user deletion.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unknown_user(id: Uuid) -> StoreError {
    StoreError::Query(format!("foreign key violation: user {} does not exist", id))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email) {
            return Err(StoreError::UniqueViolation(
                "email already registered".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email && u.id != id) {
            return Err(StoreError::UniqueViolation(
                "email already registered".to_string(),
            ));
        }

        Ok(tables.users.get_mut(&id).map(|user| {
            user.email = email.to_string();
            user.hashed_password = hashed_password.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.is_chirpy_red = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all_users(&self) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let deleted = tables.users.len() as u64;
        tables.users.clear();
        tables.chirps.clear();
        tables.refresh_tokens.clear();
        Ok(deleted)
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn insert_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(unknown_user(user_id));
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            body: body.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.chirps.push(chirp.clone());

        Ok(chirp)
    }

    async fn list_chirps(&self, author_id: Option<Uuid>) -> Result<Vec<Chirp>, StoreError> {
        let tables = self.tables.read().await;
        let mut chirps: Vec<Chirp> = tables
            .chirps
            .iter()
            .filter(|c| author_id.map_or(true, |author| c.user_id == author))
            .cloned()
            .collect();
        chirps.sort_by_key(|c| c.created_at);
        Ok(chirps)
    }

    async fn find_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.chirps.len();
        tables.chirps.retain(|c| c.id != id);
        Ok(tables.chirps.len() < before)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn insert_refresh_token(&self, record: &RefreshToken) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&record.user_id) {
            return Err(unknown_user(record.user_id));
        }
        if tables.refresh_tokens.contains_key(&record.token) {
            return Err(StoreError::UniqueViolation(
                "refresh token already exists".to_string(),
            ));
        }

        tables
            .refresh_tokens
            .insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.refresh_tokens.get(token).cloned())
    }

    async fn revoke_refresh_token(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.refresh_tokens.get_mut(token).map(|record| {
            record.revoked_at.get_or_insert(at);
            record.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token_for(user_id: Uuid, value: &str) -> RefreshToken {
        let now = Utc::now();
        RefreshToken {
            token: value.to_string(),
            user_id,
            created_at: now,
            expires_at: now + Duration::days(60),
            revoked_at: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store
            .insert_user("walt@breakingbad.com", "hash")
            .await
            .expect("first insert succeeds");

        let second = store.insert_user("walt@breakingbad.com", "hash").await;
        assert!(matches!(second, Err(StoreError::UniqueViolation(_))));
    }

    #[tokio::test]
    async fn test_refresh_token_requires_existing_user() {
        let store = MemoryStore::new();
        let result = store
            .insert_refresh_token(&token_for(Uuid::new_v4(), "abc"))
            .await;

        assert!(matches!(result, Err(StoreError::Query(_))));
    }

    #[tokio::test]
    async fn test_revoke_keeps_first_timestamp() {
        let store = MemoryStore::new();
        let user = store
            .insert_user("saul@bettercall.com", "hash")
            .await
            .expect("insert user");
        store
            .insert_refresh_token(&token_for(user.id, "abc"))
            .await
            .expect("insert token");

        let first_at = Utc::now();
        let first = store
            .revoke_refresh_token("abc", first_at)
            .await
            .expect("revoke")
            .expect("token exists");
        let second = store
            .revoke_refresh_token("abc", first_at + Duration::seconds(30))
            .await
            .expect("revoke")
            .expect("token exists");

        assert_eq!(first.revoked_at, Some(first_at));
        assert_eq!(second.revoked_at, Some(first_at));
        assert!(store
            .revoke_refresh_token("missing", first_at)
            .await
            .expect("revoke")
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_all_users_cascades() {
        let store = MemoryStore::new();
        let user = store
            .insert_user("jesse@breakingbad.com", "hash")
            .await
            .expect("insert user");
        store.insert_chirp(user.id, "hello").await.expect("insert chirp");
        store
            .insert_refresh_token(&token_for(user.id, "abc"))
            .await
            .expect("insert token");

        assert_eq!(store.delete_all_users().await.expect("purge"), 1);
        assert!(store.list_chirps(None).await.expect("list").is_empty());
        assert!(store
            .find_refresh_token("abc")
            .await
            .expect("find")
            .is_none());
    }

    #[tokio::test]
    async fn test_list_chirps_filters_by_author() {
        let store = MemoryStore::new();
        let a = store.insert_user("a@example.com", "hash").await.expect("insert");
        let b = store.insert_user("b@example.com", "hash").await.expect("insert");
        store.insert_chirp(a.id, "one").await.expect("insert chirp");
        store.insert_chirp(b.id, "two").await.expect("insert chirp");
        store.insert_chirp(a.id, "three").await.expect("insert chirp");

        let all = store.list_chirps(None).await.expect("list");
        assert_eq!(all.len(), 3);

        let only_a: Vec<String> = store
            .list_chirps(Some(a.id))
            .await
            .expect("list")
            .into_iter()
            .map(|c| c.body)
            .collect();
        assert_eq!(only_a, vec!["one".to_string(), "three".to_string()]);
    }
}
