/// Ownership checks for mutating user-owned resources

use uuid::Uuid;

use crate::error::AuthError;

/// A resource that belongs to exactly one user
pub trait OwnedResource {
    fn owner_id(&self) -> Uuid;
}

/// Permit the call only if `identity` owns the resource.
pub fn authorize(identity: Uuid, owner_id: Uuid) -> Result<(), AuthError> {
    if identity == owner_id {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Fetch-then-check: `NotFound` for a missing resource, `Forbidden` for
/// someone else's, otherwise the resource itself.
pub fn authorize_mutation<R: OwnedResource>(
    identity: Uuid,
    resource: Option<R>,
) -> Result<R, AuthError> {
    let resource = resource.ok_or(AuthError::NotFound)?;
    authorize(identity, resource.owner_id())?;
    Ok(resource)
}
