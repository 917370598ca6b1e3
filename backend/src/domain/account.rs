//! Account and session records owned by the backend's auth service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Credentials, SessionId};

/// Authentication account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Authenticated session issued on sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub account_id: AccountId,
    pub expires_at: DateTime<Utc>,
    /// Whether this is the session the client is currently using.
    pub current: bool,
}

/// Account creation request passed to the account gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub id: AccountId,
    pub credentials: Credentials,
    pub name: String,
}

/// Result of a sign-out request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome", content = "sessionId")]
pub enum SignOutOutcome {
    /// The current session existed and was deleted.
    SessionDeleted(SessionId),
    /// No session was active; nothing was deleted.
    NoActiveSession,
}
