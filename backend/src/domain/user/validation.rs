//! Validation contract for create and edit payloads.
//!
//! Fields are checked in a fixed order and the first failure wins:
//! `id` (edit only), `first_name`, `last_name`, `email`, `phone_number`,
//! `birthdate`, `username`.

use serde_json::{Map, Value};

use super::{User, UserId, UserProfile};

/// Payload member subject to validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    /// `id`, required on edit only.
    Id,
    /// `first_name`.
    FirstName,
    /// `last_name`.
    LastName,
    /// `email`.
    Email,
    /// `phone_number`.
    PhoneNumber,
    /// `birthdate`.
    Birthdate,
    /// `username`.
    Username,
}

impl UserField {
    /// JSON member name.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
            Self::Birthdate => "birthdate",
            Self::Username => "username",
        }
    }

    /// Name used in client-facing messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::FirstName => "Firstname",
            Self::LastName => "Lastname",
            Self::Email => "Email",
            Self::PhoneNumber => "Phone",
            Self::Birthdate => "Birthdate",
            Self::Username => "Username",
        }
    }
}

/// Reasons a payload is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The member is absent, null or blank.
    #[error("{} is required", .field.label())]
    Missing {
        /// Offending member.
        field: UserField,
    },
    /// The member is present but is not a JSON string.
    #[error("{} must be a string", .field.label())]
    NotAString {
        /// Offending member.
        field: UserField,
    },
}

impl UserValidationError {
    /// Offending member.
    #[must_use]
    pub const fn field(self) -> UserField {
        match self {
            Self::Missing { field } | Self::NotAString { field } => field,
        }
    }

    /// Machine-readable reason.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing_field",
            Self::NotAString { .. } => "invalid_type",
        }
    }
}

impl UserProfile {
    /// Validate a create payload.
    ///
    /// A client-supplied `id` is discarded; creation always assigns a fresh
    /// one. Members outside the profile are kept as extras.
    ///
    /// # Errors
    /// Returns the first [`UserValidationError`] in field order.
    pub fn try_from_payload(mut payload: Map<String, Value>) -> Result<Self, UserValidationError> {
        payload.remove(UserField::Id.key());
        take_profile(payload)
    }
}

impl User {
    /// Validate an edit payload, which must carry the target `id`.
    ///
    /// The identifier is opaque: it is not trimmed, only required to be a
    /// non-empty string.
    ///
    /// # Errors
    /// Returns the first [`UserValidationError`] in field order.
    pub fn try_from_edit_payload(
        mut payload: Map<String, Value>,
    ) -> Result<Self, UserValidationError> {
        let id = match payload.remove(UserField::Id.key()) {
            Some(Value::String(id)) => UserId::new(id)?,
            None | Some(Value::Null) => {
                return Err(UserValidationError::Missing {
                    field: UserField::Id,
                });
            }
            Some(_) => {
                return Err(UserValidationError::NotAString {
                    field: UserField::Id,
                });
            }
        };
        Ok(Self::new(id, take_profile(payload)?))
    }
}

fn take_profile(mut payload: Map<String, Value>) -> Result<UserProfile, UserValidationError> {
    let first_name = take_text(&mut payload, UserField::FirstName)?;
    let last_name = take_text(&mut payload, UserField::LastName)?;
    let email = take_text(&mut payload, UserField::Email)?;
    let phone_number = take_text(&mut payload, UserField::PhoneNumber)?;
    let birthdate = take_present(&mut payload, UserField::Birthdate)?;
    let username = take_text(&mut payload, UserField::Username)?;

    Ok(UserProfile {
        first_name,
        last_name,
        email,
        phone_number,
        birthdate,
        username,
        extra: payload,
    })
}

fn take_text(payload: &mut Map<String, Value>, field: UserField) -> Result<String, UserValidationError> {
    match payload.remove(field.key()) {
        Some(Value::String(text)) if !is_blank_text(&text) => Ok(text),
        None | Some(Value::Null | Value::String(_)) => Err(UserValidationError::Missing { field }),
        Some(_) => Err(UserValidationError::NotAString { field }),
    }
}

// Blankness follows ECMAScript `String.prototype.trim`: Unicode White_Space
// without NEL, plus the byte order mark.
fn is_blank_text(text: &str) -> bool {
    text.chars()
        .all(|c| c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}'))
}

// Birthdate is not text-checked: any value counts unless it is null, false,
// zero or the empty string.
fn take_present(payload: &mut Map<String, Value>, field: UserField) -> Result<Value, UserValidationError> {
    match payload.remove(field.key()) {
        Some(value) if !is_blank(&value) => Ok(value),
        _ => Err(UserValidationError::Missing { field }),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(text) => text.is_empty(),
        Value::Number(number) => number.as_f64() == Some(0.0),
        _ => false,
    }
}
