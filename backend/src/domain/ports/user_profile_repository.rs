//! Port abstraction for the users collection.
use async_trait::async_trait;

use crate::domain::{AccountId, NewUserProfile, UserProfile};

use super::{classify_backend_failure, define_port_error};

define_port_error! {
    /// Errors raised by user profile repository adapters.
    pub enum UserProfileRepositoryError {
        /// No session, or the session may not access the collection.
        Unauthorized { message: String } => "user profile access denied: {message}",
        /// The collection or document does not exist.
        NotFound { message: String } => "user profile not found: {message}",
        /// A document with the same id already exists.
        Conflict { message: String } => "user profile already exists: {message}",
        /// The document failed the collection's schema.
        Rejected { message: String } => "user profile rejected: {message}",
        /// Network transport failed or the backend errored.
        Transport { message: String } => "user profile repository transport failed: {message}",
        /// The response could not be decoded.
        Decode { message: String } => "user profile decode failed: {message}",
    }
}

classify_backend_failure!(UserProfileRepositoryError);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Write a new profile document.
    async fn create(&self, profile: &NewUserProfile)
    -> Result<UserProfile, UserProfileRepositoryError>;

    /// Fetch the first profile whose `accountId` equals `account_id`.
    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError>;
}
