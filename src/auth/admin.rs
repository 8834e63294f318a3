/// Destructive administrative operations

use crate::configuration::Environment;
use crate::error::AuthError;
use crate::store::UserStore;

/// Delete every user along with their refresh tokens and chirps.
///
/// Only runs in `Development`; anywhere else the request is refused with
/// `Forbidden` and nothing is touched.
pub async fn purge_all(environment: Environment, users: &dyn UserStore) -> Result<u64, AuthError> {
    if environment != Environment::Development {
        tracing::warn!(environment = ?environment, "Refused to purge users outside development");
        return Err(AuthError::Forbidden);
    }

    let deleted = users.delete_all_users().await?;
    tracing::warn!(deleted = deleted, "Purged all users and their refresh tokens");
    Ok(deleted)
}
