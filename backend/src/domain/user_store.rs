//! File-backed record store.
//!
//! Every operation reloads the full collection through the
//! [`UserRepository`] port and every mutation writes the full collection
//! back. There is no cache, so the store never serves data that differs from
//! the document. The store itself does not serialise writers; callers that
//! need a consistent read-modify-write cycle hold
//! [`crate::domain::UserDirectoryService`]'s write lock around it.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId, UserProfile};

/// Failures raised by [`UserStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserStoreError {
    /// No stored user has the requested identifier.
    #[error("user {id} not found")]
    NotFound {
        /// Identifier that failed to match.
        id: UserId,
    },
    /// The document could not be read or written.
    #[error(transparent)]
    Persistence(#[from] UserPersistenceError),
}

/// Record store mediating all access to the user collection.
pub struct UserStore<R> {
    repository: Arc<R>,
}

impl<R> Clone for UserStore<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> UserStore<R>
where
    R: UserRepository,
{
    /// Wrap the repository holding the collection.
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Load the whole collection.
    ///
    /// # Errors
    /// Propagates read and parse failures from the repository.
    pub async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        self.repository.load_all().await
    }

    /// Linear scan for the user with `id`.
    ///
    /// # Errors
    /// Propagates read and parse failures from the repository.
    pub async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.list_all().await?;
        Ok(users.into_iter().find(|user| user.id() == id))
    }

    /// True when any stored user has `value` as email or username.
    ///
    /// # Errors
    /// Propagates read and parse failures from the repository.
    pub async fn exists_by_email_or_username(
        &self,
        value: &str,
    ) -> Result<bool, UserPersistenceError> {
        let users = self.list_all().await?;
        Ok(users.iter().any(|user| user.claims(value)))
    }

    /// Append a new user with a fresh identifier and persist the result.
    ///
    /// # Errors
    /// Propagates repository failures; nothing is written if the load fails.
    pub async fn append(&self, profile: UserProfile) -> Result<Vec<User>, UserPersistenceError> {
        let mut users = self.list_all().await?;
        let user = User::new(UserId::random(), profile);
        debug!(user_id = %user.id(), position = users.len(), "appending user");
        users.push(user);
        self.repository.save_all(&users).await?;
        Ok(users)
    }

    /// Overwrite the user with `id` by `user`, keeping its position.
    ///
    /// The replacement is stored as supplied, including its own identifier.
    ///
    /// # Errors
    /// [`UserStoreError::NotFound`] when `id` matches nothing; repository
    /// failures otherwise.
    pub async fn replace(&self, id: &UserId, user: User) -> Result<Vec<User>, UserStoreError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(UserStoreError::NotFound { id: id.clone() });
        }

        let mut users = self.list_all().await?;
        let slot = users
            .iter_mut()
            .find(|existing| existing.id() == id)
            .ok_or_else(|| UserStoreError::NotFound { id: id.clone() })?;
        *slot = user;
        debug!(user_id = %id, "replacing user");
        self.repository.save_all(&users).await?;
        Ok(users)
    }

    /// Remove the user with `id` and persist the result.
    ///
    /// # Errors
    /// [`UserStoreError::NotFound`] when `id` matches nothing; repository
    /// failures otherwise.
    pub async fn remove(&self, id: &UserId) -> Result<Vec<User>, UserStoreError> {
        let mut users = self.list_all().await?;
        let index = users
            .iter()
            .position(|user| user.id() == id)
            .ok_or_else(|| UserStoreError::NotFound { id: id.clone() })?;
        users.remove(index);
        debug!(user_id = %id, "removing user");
        self.repository.save_all(&users).await?;
        Ok(users)
    }
}

#[cfg(test)]
#[path = "user_store_tests.rs"]
mod tests;
