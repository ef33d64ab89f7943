//! Driven port for loading and saving the whole user collection.
//!
//! The registry has no partial reads or writes: adapters always hand back the
//! complete ordered collection and always persist it in full.

use async_trait::async_trait;

use crate::domain::User;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// The document is missing or could not be read.
        Read { location: String, message: String } => "failed to read users from {location}: {message}",
        /// The document was read but is not a JSON array of users.
        Malformed { location: String, message: String } => "users document at {location} is malformed: {message}",
        /// The document could not be written back.
        Write { location: String, message: String } => "failed to write users to {location}: {message}",
    }
}

/// Whole-collection persistence for user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Load every stored user in insertion order.
    async fn load_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Replace the stored collection with `users`.
    async fn save_all(&self, users: &[User]) -> Result<(), UserPersistenceError>;
}
