//! Driving port for read-only user lookups.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Read side of the registry used by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every stored user in insertion order.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// The user with `id`, or `None` when absent.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error>;
}
