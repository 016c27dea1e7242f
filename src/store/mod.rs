use axum::async_trait;

use crate::profiles::model::UserProfile;

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[cfg(test)]
pub use memory::MemoryProfileStore;
pub use postgres::PgProfileStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already in use")]
    DuplicateEmail,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// A row ready to insert. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Column changes for an update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

/// Persistent table of user profiles.
///
/// Implementations enforce email uniqueness and report a clash as
/// [`StoreError::DuplicateEmail`]; ids are assigned on insert and never reused.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn insert(&self, new: NewProfile) -> Result<UserProfile, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<UserProfile>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, StoreError>;
    /// Every term must appear (case-insensitively) in the email or the name.
    async fn list(&self, terms: &[String]) -> Result<Vec<UserProfile>, StoreError>;
    /// Returns `None` when no row has this id.
    async fn update(
        &self,
        id: i64,
        changes: ProfileChanges,
    ) -> Result<Option<UserProfile>, StoreError>;
    /// Returns `false` when no row has this id.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
