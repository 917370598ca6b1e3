//! Application-level user profile document.
//!
//! A profile is written once at registration and links the auth account to
//! the public username and avatar shown next to a creator's posts.

use serde::{Deserialize, Serialize};
use url::Url;

use super::{AccountId, DocumentId};

/// User document stored in the users collection.
///
/// ## Invariants
/// - `account_id` references the account that owned the session when the
///   profile was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: DocumentId,
    pub account_id: AccountId,
    pub email: String,
    pub username: String,
    pub avatar: Url,
}

/// Profile document to be written by the profile repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserProfile {
    pub id: DocumentId,
    pub account_id: AccountId,
    pub email: String,
    pub username: String,
    pub avatar: Url,
}

impl NewUserProfile {
    /// The profile as it reads back once stored.
    pub fn into_profile(self) -> UserProfile {
        let Self {
            id,
            account_id,
            email,
            username,
            avatar,
        } = self;
        UserProfile {
            id,
            account_id,
            email,
            username,
            avatar,
        }
    }
}
