//! Account and session domain service.
//!
//! Covers registration, sign-in, sign-out and resolving the profile of the
//! signed-in account. "Not signed in" is an expected state here: lookups
//! report it as `None` and sign-out as [`SignOutOutcome::NoActiveSession`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccountGateway, AccountGatewayError, AvatarGenerator, BackendFailure, UserProfileRepository,
    UserProfileRepositoryError,
};
use crate::domain::{
    Account, AccountId, Credentials, DocumentId, Error, NewAccount, NewUserProfile, Registration,
    Session, SignOutOutcome, UserProfile,
};

fn map_account_error(context: &str, error: AccountGatewayError) -> Error {
    Error::from_backend(error.failure(), context, error)
}

fn map_profile_error(context: &str, error: UserProfileRepositoryError) -> Error {
    Error::from_backend(error.failure(), context, error)
}

/// Service behind the account-facing façade operations.
pub struct AccountService<A, P, V> {
    accounts: Arc<A>,
    profiles: Arc<P>,
    avatars: Arc<V>,
}

impl<A, P, V> AccountService<A, P, V> {
    /// Create a new service over the account, profile and avatar ports.
    pub fn new(accounts: Arc<A>, profiles: Arc<P>, avatars: Arc<V>) -> Self {
        Self {
            accounts,
            profiles,
            avatars,
        }
    }
}

impl<A, P, V> AccountService<A, P, V>
where
    A: AccountGateway,
    P: UserProfileRepository,
    V: AvatarGenerator,
{
    /// Register an account, sign it in and write its profile document.
    ///
    /// The account is not removed if any later step fails; the orphaned
    /// account id is logged.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<UserProfile, Error> {
        let registration = Registration::try_from_parts(email, password, username)
            .map_err(|err| Error::validation_failed(err.to_string()))?;

        let account = self
            .accounts
            .create_account(&NewAccount {
                id: AccountId::unique(),
                credentials: registration.credentials().clone(),
                name: registration.username().to_owned(),
            })
            .await
            .map_err(|err| map_account_error("failed to create account", err))?;
        debug!(account_id = %account.id, "account created");

        self.complete_registration(&registration, &account.id)
            .await
            .map_err(|err| {
                warn!(
                    account_id = %account.id,
                    error = %err,
                    "account left without a user profile"
                );
                err
            })
    }

    async fn complete_registration(
        &self,
        registration: &Registration,
        account_id: &AccountId,
    ) -> Result<UserProfile, Error> {
        let avatar = self
            .avatars
            .initials_url(registration.username())
            .map_err(|err| Error::unknown("failed to build avatar url").with_cause(err))?;

        self.open_session(registration.credentials()).await?;

        let profile = NewUserProfile {
            id: DocumentId::unique(),
            account_id: account_id.clone(),
            email: registration.credentials().email().to_owned(),
            username: registration.username().to_owned(),
            avatar,
        };
        debug!(profile_id = %profile.id, "writing user profile");

        self.profiles
            .create(&profile)
            .await
            .map_err(|err| map_profile_error("failed to create user profile", err))
    }

    /// Exchange email and password for a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, Error> {
        let credentials = Credentials::try_from_parts(email, password)
            .map_err(|err| Error::validation_failed(err.to_string()))?;
        self.open_session(&credentials).await
    }

    async fn open_session(&self, credentials: &Credentials) -> Result<Session, Error> {
        let session = self
            .accounts
            .create_email_session(credentials)
            .await
            .map_err(|err| map_account_error("sign-in failed", err))?;
        info!(account_id = %session.account_id, session_id = %session.id, "session created");
        Ok(session)
    }

    /// The account owning the current session.
    pub async fn get_account(&self) -> Result<Account, Error> {
        self.accounts
            .current_account()
            .await
            .map_err(|err| map_account_error("failed to load current account", err))
    }

    /// The profile of the signed-in account.
    ///
    /// Returns `None` both when nobody is signed in and when the signed-in
    /// account has no profile document.
    pub async fn get_current_user(&self) -> Result<Option<UserProfile>, Error> {
        let account = match self.accounts.current_account().await {
            Ok(account) => account,
            Err(err)
                if matches!(
                    err.failure(),
                    BackendFailure::Unauthorized | BackendFailure::NotFound
                ) =>
            {
                debug!(error = %err, "no authenticated account");
                return Ok(None);
            }
            Err(err) => return Err(map_account_error("failed to load current account", err)),
        };

        let profile = self
            .profiles
            .find_by_account(&account.id)
            .await
            .map_err(|err| map_profile_error("failed to load user profile", err))?;
        if profile.is_none() {
            warn!(account_id = %account.id, "no user profile for the current account");
        }
        Ok(profile)
    }

    /// Delete the current session when there is one.
    pub async fn sign_out(&self) -> Result<SignOutOutcome, Error> {
        let session = match self.accounts.current_session().await {
            Ok(session) => session,
            Err(err)
                if matches!(
                    err.failure(),
                    BackendFailure::Unauthorized | BackendFailure::NotFound
                ) =>
            {
                info!("no active session to sign out");
                return Ok(SignOutOutcome::NoActiveSession);
            }
            Err(err) => return Err(map_account_error("failed to load current session", err)),
        };

        self.accounts
            .delete_current_session()
            .await
            .map_err(|err| map_account_error("failed to delete session", err))?;
        info!(session_id = %session.id, "session deleted");
        Ok(SignOutOutcome::SessionDeleted(session.id))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
