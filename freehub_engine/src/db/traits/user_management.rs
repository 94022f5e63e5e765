use super::StorageError;
use crate::db_types::UserProfile;

#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Records the profile, replacing the name and email if the user is already known.
    async fn upsert_user(&self, user: &UserProfile) -> Result<(), StorageError>;
}
