//! Identifier newtypes for BaaS records.
//!
//! The backend accepts ids of at most 36 characters drawn from
//! `[A-Za-z0-9._-]` that do not start with a special character. Each newtype
//! enforces that shape on construction so adapters never send an id the
//! backend would reject.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Maximum identifier length accepted by the backend.
pub const ID_MAX_LEN: usize = 36;

/// Validation errors returned when constructing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdValidationError {
    /// Identifier is empty.
    #[error("identifier must not be empty")]
    Empty,
    /// Identifier exceeds [`ID_MAX_LEN`] characters.
    #[error("identifier must be at most {max} characters")]
    TooLong { max: usize },
    /// Identifier starts with `.`, `-` or `_`.
    #[error("identifier must start with a letter or digit")]
    LeadingSpecialCharacter,
    /// Identifier contains a character outside `[A-Za-z0-9._-]`.
    #[error("identifier contains invalid character {character:?}")]
    InvalidCharacter { character: char },
}

fn validate_id(raw: &str) -> Result<(), IdValidationError> {
    let first = raw.chars().next().ok_or(IdValidationError::Empty)?;
    if raw.chars().count() > ID_MAX_LEN {
        return Err(IdValidationError::TooLong { max: ID_MAX_LEN });
    }
    if !first.is_ascii_alphanumeric() {
        return Err(IdValidationError::LeadingSpecialCharacter);
    }
    match raw
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
    {
        Some(character) => Err(IdValidationError::InvalidCharacter { character }),
        None => Ok(()),
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the identifier from borrowed input.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                Self::from_owned(id.as_ref().to_owned())
            }

            /// Generate a fresh identifier.
            pub fn unique() -> Self {
                Self(Uuid::new_v4().simple().to_string())
            }

            fn from_owned(id: String) -> Result<Self, IdValidationError> {
                validate_id(&id)?;
                Ok(Self(id))
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::from_owned(value)
            }
        }
    };
}

define_id! {
    /// Identifier of an authentication account.
    AccountId
}

define_id! {
    /// Identifier of a database document (user profile or video post).
    DocumentId
}

define_id! {
    /// Identifier of a stored file.
    FileId
}

define_id! {
    /// Identifier of an authenticated session.
    SessionId
}

define_id! {
    /// Identifier of a configured backend resource: project, database,
    /// collection or storage bucket.
    ResourceId
}
