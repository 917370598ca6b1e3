//! Assembles the Appwrite-backed façade from validated configuration.

use std::sync::Arc;

use tracing::info;

use crate::domain::{Backend, BackendPorts};
use crate::outbound::appwrite::{
    AppwriteAccountGateway, AppwriteAvatars, AppwriteClient, AppwriteClientError,
    AppwriteFileStorage, AppwriteUserProfileRepository, AppwriteVideoPostRepository,
    CollectionRef,
};
use crate::settings::AppwriteConfig;

/// The façade as deployed: every port served by Appwrite.
pub type AppwriteBackend = Backend<
    AppwriteAccountGateway,
    AppwriteUserProfileRepository,
    AppwriteVideoPostRepository,
    AppwriteFileStorage,
    AppwriteAvatars,
>;

/// Build the façade over one shared Appwrite client.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be constructed from
/// `config`.
pub fn appwrite_backend(config: &AppwriteConfig) -> Result<AppwriteBackend, AppwriteClientError> {
    let client = AppwriteClient::new(
        config.endpoint.clone(),
        config.project.clone(),
        &config.platform,
        config.request_timeout,
    )?;
    info!(
        endpoint = %config.endpoint,
        project = %config.project,
        "appwrite client ready"
    );

    let ports = BackendPorts {
        accounts: Arc::new(AppwriteAccountGateway::new(client.clone())),
        profiles: Arc::new(AppwriteUserProfileRepository::new(
            client.clone(),
            CollectionRef::new(config.database.clone(), config.user_collection.clone()),
        )),
        posts: Arc::new(AppwriteVideoPostRepository::new(
            client.clone(),
            CollectionRef::new(config.database.clone(), config.video_collection.clone()),
        )),
        storage: Arc::new(AppwriteFileStorage::new(client.clone(), config.bucket.clone())),
        avatars: Arc::new(AppwriteAvatars::new(client)),
    };
    Ok(Backend::new(ports, config.upload_compensation))
}
