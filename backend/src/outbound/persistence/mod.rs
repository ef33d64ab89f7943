//! Persistence adapters for the user collection.
//!
//! Adapters only translate between the stored representation and domain
//! types; uniqueness, lookup and ordering rules live in the domain.

mod json_file_user_repository;

pub use json_file_user_repository::JsonFileUserRepository;
