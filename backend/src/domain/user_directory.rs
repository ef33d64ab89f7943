//! User directory service implementing the driving ports.
//!
//! The service owns the single-writer lock: every mutating command runs its
//! whole read-modify-write cycle, uniqueness probe included, while holding
//! it. Two concurrent creates therefore observe each other instead of the
//! later write silently discarding the earlier one.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{Error, User, UserId, UserProfile, UserStore, UserStoreError};

/// Message returned whenever an identifier matches no stored user.
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";

/// Message returned when a new user's email or username is already claimed.
pub const DUPLICATE_IDENTITY_MESSAGE: &str = "Email or username already exists";

/// Registry use-cases over a [`UserStore`].
pub struct UserDirectoryService<R> {
    store: UserStore<R>,
    write_lock: Mutex<()>,
}

impl<R> UserDirectoryService<R>
where
    R: UserRepository,
{
    /// Build the service around `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            store: UserStore::new(repository),
            write_lock: Mutex::new(()),
        }
    }

    fn map_persistence_error(err: &UserPersistenceError) -> Error {
        error!(error = %err, "user store unavailable");
        Error::internal(format!("user store unavailable: {err}"))
    }

    fn map_store_error(err: UserStoreError) -> Error {
        match err {
            UserStoreError::NotFound { id } => Error::not_found(USER_NOT_FOUND_MESSAGE)
                .with_details(json!({ "id": id.as_ref(), "code": "user_not_found" })),
            UserStoreError::Persistence(err) => Self::map_persistence_error(&err),
        }
    }

    async fn is_claimed(&self, profile: &UserProfile) -> Result<bool, UserPersistenceError> {
        Ok(self.store.exists_by_email_or_username(profile.email()).await?
            || self
                .store
                .exists_by_email_or_username(profile.username())
                .await?)
    }
}

#[async_trait]
impl<R> UsersQuery for UserDirectoryService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.store
            .list_all()
            .await
            .map_err(|err| Self::map_persistence_error(&err))
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|err| Self::map_persistence_error(&err))
    }
}

#[async_trait]
impl<R> UsersCommand for UserDirectoryService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, profile: UserProfile) -> Result<Vec<User>, Error> {
        let _guard = self.write_lock.lock().await;

        let claimed = self
            .is_claimed(&profile)
            .await
            .map_err(|err| Self::map_persistence_error(&err))?;
        if claimed {
            info!(
                email = profile.email(),
                username = profile.username(),
                "rejected duplicate user"
            );
            return Err(Error::conflict(DUPLICATE_IDENTITY_MESSAGE)
                .with_details(json!({ "code": "duplicate_identity" })));
        }

        let users = self
            .store
            .append(profile)
            .await
            .map_err(|err| Self::map_persistence_error(&err))?;
        if let Some(created) = users.last() {
            info!(user_id = %created.id(), total = users.len(), "user created");
        }
        Ok(users)
    }

    async fn edit_user(&self, user: User) -> Result<Vec<User>, Error> {
        let _guard = self.write_lock.lock().await;

        let id = user.id().clone();
        let users = self
            .store
            .replace(&id, user)
            .await
            .map_err(Self::map_store_error)?;
        info!(user_id = %id, total = users.len(), "user edited");
        Ok(users)
    }

    async fn delete_user(&self, id: &UserId) -> Result<Vec<User>, Error> {
        let _guard = self.write_lock.lock().await;

        let users = self
            .store
            .remove(id)
            .await
            .map_err(Self::map_store_error)?;
        info!(user_id = %id, total = users.len(), "user deleted");
        Ok(users)
    }
}

#[cfg(test)]
#[path = "user_directory_tests.rs"]
mod tests;
