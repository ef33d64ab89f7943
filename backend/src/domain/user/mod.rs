//! User record stored in the registry.
//!
//! A record is a fixed set of profile fields plus whatever additional JSON
//! members the client supplied; those extras are stored verbatim so a record
//! reads back exactly as it was written.

mod validation;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub use self::validation::{UserField, UserValidationError};

/// Identifier of a stored user.
///
/// Generated as a UUIDv4 string on creation. Identifiers read back from the
/// document or supplied on edit are treated as opaque non-empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Errors
    /// Returns [`UserValidationError::Missing`] for an empty identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::Missing {
                field: UserField::Id,
            });
        }
        Ok(Self(id))
    }

    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Everything a client submits about a user except the identifier.
///
/// ## Invariants
/// - `first_name`, `last_name`, `email`, `phone_number` and `username` are
///   non-empty once trimmed. The stored values are kept untrimmed.
/// - `birthdate` is present and not blank; its format is not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    birthdate: Value,
    username: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl UserProfile {
    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Contact email; unique across the registry at creation time.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Contact phone number.
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Birthdate exactly as submitted.
    #[must_use]
    pub const fn birthdate(&self) -> &Value {
        &self.birthdate
    }

    /// Login handle; unique across the registry at creation time.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Additional client-supplied members kept alongside the profile.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// A stored user: identifier plus profile, serialised as one flat object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    #[serde(flatten)]
    profile: UserProfile,
}

impl User {
    /// Build a user from validated parts.
    #[must_use]
    pub const fn new(id: UserId, profile: UserProfile) -> Self {
        Self { id, profile }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Submitted profile fields.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// True when either the email or the username equals `value`.
    #[must_use]
    pub fn claims(&self, value: &str) -> bool {
        self.profile.email == value || self.profile.username == value
    }
}
