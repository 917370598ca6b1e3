//! Driven port for the backend's account service.
//!
//! Sessions are ambient: a successful [`AccountGateway::create_email_session`]
//! makes every later call on the same gateway act as that account until
//! [`AccountGateway::delete_current_session`] runs.

use async_trait::async_trait;

use crate::domain::{Account, Credentials, NewAccount, Session};

use super::{classify_backend_failure, define_port_error};

define_port_error! {
    /// Errors surfaced by account gateway adapters.
    pub enum AccountGatewayError {
        /// Credentials rejected or no session is active.
        Unauthorized { message: String } => "account gateway rejected credentials: {message}",
        /// The account or session does not exist.
        NotFound { message: String } => "account record not found: {message}",
        /// An account with the same id or email already exists.
        Conflict { message: String } => "account already exists: {message}",
        /// The request was refused as invalid.
        Rejected { message: String } => "account request rejected: {message}",
        /// Network transport failed or the backend errored.
        Transport { message: String } => "account gateway transport failed: {message}",
        /// The response could not be decoded.
        Decode { message: String } => "account response decode failed: {message}",
    }
}

classify_backend_failure!(AccountGatewayError);

/// Port for account, session and sign-in operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountGateway: Send + Sync {
    /// Register a new account.
    async fn create_account(&self, account: &NewAccount) -> Result<Account, AccountGatewayError>;

    /// Exchange email and password for a session.
    async fn create_email_session(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, AccountGatewayError>;

    /// Fetch the account owning the current session.
    async fn current_account(&self) -> Result<Account, AccountGatewayError>;

    /// Fetch the session addressed by the `current` token.
    async fn current_session(&self) -> Result<Session, AccountGatewayError>;

    /// Delete the session addressed by the `current` token.
    async fn delete_current_session(&self) -> Result<(), AccountGatewayError>;
}
