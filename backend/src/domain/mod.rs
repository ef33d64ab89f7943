//! Domain primitives, services and ports.
//!
//! Purpose: define the user record, its validation contract and the record
//! store that owns the read-modify-write cycle over the collection. Nothing
//! here knows about HTTP or the filesystem; adapters reach the domain through
//! [`ports`].
//!
//! Public surface:
//! - `User`, `UserId`, `UserProfile`: the stored record and its parts.
//! - `UserValidationError`, `UserField`: payload validation failures.
//! - `UserStore`: list/find/exists/append/replace/remove over the collection.
//! - `UserDirectoryService`: driving-port implementation serialising writes.
//! - `Error` (alias of `DomainError`), `ErrorCode`: transport-agnostic failure
//!   envelope.
//! - `TraceId`: request correlation identifier.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_directory;
pub mod user_store;

pub use self::error::{DomainError, DomainError as Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserField, UserId, UserProfile, UserValidationError};
pub use self::user_directory::{
    DUPLICATE_IDENTITY_MESSAGE, USER_NOT_FOUND_MESSAGE, UserDirectoryService,
};
pub use self::user_store::{UserStore, UserStoreError};
