//! Appwrite account and session adapter.

use async_trait::async_trait;
use tracing::debug;

use super::client::AppwriteClient;
use super::dto::{AccountDto, CreateAccountBody, EmailSessionBody, SessionDto};
use crate::domain::ports::{AccountGateway, AccountGatewayError};
use crate::domain::{Account, Credentials, NewAccount, Session};

const CURRENT_SESSION: &str = "current";

/// [`AccountGateway`] backed by the Appwrite account API.
///
/// The session cookie lives in the shared client, so every adapter built
/// from the same [`AppwriteClient`] acts as the signed-in account.
#[derive(Debug, Clone)]
pub struct AppwriteAccountGateway {
    client: AppwriteClient,
}

impl AppwriteAccountGateway {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AccountGateway for AppwriteAccountGateway {
    async fn create_account(&self, account: &NewAccount) -> Result<Account, AccountGatewayError> {
        let body = CreateAccountBody {
            user_id: account.id.as_str(),
            email: account.credentials.email(),
            password: account.credentials.password(),
            name: account.name.as_str(),
        };
        let request = self.client.post(self.client.url(&["account"])?).json(&body);
        let dto: AccountDto = self.client.send_json("create_account", request).await?;
        dto.into_domain().map_err(AccountGatewayError::decode)
    }

    async fn create_email_session(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, AccountGatewayError> {
        let body = EmailSessionBody {
            email: credentials.email(),
            password: credentials.password(),
        };
        let url = self.client.url(&["account", "sessions", "email"])?;
        let request = self.client.post(url).json(&body);
        let dto: SessionDto = self
            .client
            .send_json("create_email_session", request)
            .await?;
        dto.into_domain().map_err(AccountGatewayError::decode)
    }

    async fn current_account(&self) -> Result<Account, AccountGatewayError> {
        let request = self.client.get(self.client.url(&["account"])?);
        let dto: AccountDto = self.client.send_json("get_account", request).await?;
        dto.into_domain().map_err(AccountGatewayError::decode)
    }

    async fn current_session(&self) -> Result<Session, AccountGatewayError> {
        let url = self
            .client
            .url(&["account", "sessions", CURRENT_SESSION])?;
        let dto: SessionDto = self
            .client
            .send_json("get_session", self.client.get(url))
            .await?;
        dto.into_domain().map_err(AccountGatewayError::decode)
    }

    async fn delete_current_session(&self) -> Result<(), AccountGatewayError> {
        let url = self
            .client
            .url(&["account", "sessions", CURRENT_SESSION])?;
        self.client
            .send("delete_session", self.client.delete(url))
            .await?;
        debug!("current session deleted");
        Ok(())
    }
}
