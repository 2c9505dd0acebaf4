//! Ownership guard for user-owned resources.
//!
//! Mutations on an owned resource must pass [`assert_owner`] after the
//! resource has been loaded and before any write is issued.

use crate::error::CoreError;
use crate::types::DbId;

/// A record that belongs to exactly one user.
pub trait Owned {
    fn owner_id(&self) -> DbId;
}

/// Check that `resource` exists and belongs to `acting_user_id`.
///
/// Returns the resource on success. A missing resource is
/// [`CoreError::NotFound`]; a resource owned by someone else is
/// [`CoreError::Unauthorized`]. Neither error carries resource fields.
pub fn assert_owner<R: Owned>(
    resource: Option<R>,
    entity: &'static str,
    id: DbId,
    acting_user_id: DbId,
) -> Result<R, CoreError> {
    let resource = resource.ok_or(CoreError::NotFound { entity, id })?;

    if resource.owner_id() != acting_user_id {
        return Err(CoreError::Unauthorized(format!(
            "You can only modify your own {}",
            entity.to_lowercase()
        )));
    }

    Ok(resource)
}
