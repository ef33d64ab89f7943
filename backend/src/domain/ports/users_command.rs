//! Driving port for registry mutations.
//!
//! Every command answers with the complete collection as it stands after the
//! write, which is what the HTTP envelope echoes back to clients.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId, UserProfile};

/// Write side of the registry used by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a new user under a freshly generated identifier.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::Conflict`] when the email or username is
    /// already claimed by another user.
    async fn create_user(&self, profile: UserProfile) -> Result<Vec<User>, Error>;

    /// Replace the stored user sharing `user`'s identifier.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when no user has that identifier.
    async fn edit_user(&self, user: User) -> Result<Vec<User>, Error>;

    /// Remove the user with `id`.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when no user has that identifier.
    async fn delete_user(&self, id: &UserId) -> Result<Vec<User>, Error>;
}
