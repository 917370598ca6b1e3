//! The backend façade: one purpose-named async operation per app use case.
//!
//! [`Backend`] is generic over the driven ports so the same façade runs
//! against the managed backend in production and against in-memory ports in
//! tests.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{
    AccountGateway, AvatarGenerator, FileStorage, UserProfileRepository, VideoPostRepository,
};
use crate::domain::{
    Account, AccountService, CreateVideoPostForm, DocumentId, Error, FileId, FileKind, MediaAsset,
    MediaService, Session, SignOutOutcome, UploadCompensation, UserProfile, VideoPost,
    VideoPostService,
};

/// Driven ports the façade is assembled from.
pub struct BackendPorts<A, P, R, S, V> {
    pub accounts: Arc<A>,
    pub profiles: Arc<P>,
    pub posts: Arc<R>,
    pub storage: Arc<S>,
    pub avatars: Arc<V>,
}

/// Façade over accounts, profiles, posts and file storage.
pub struct Backend<A, P, R, S, V> {
    accounts: AccountService<A, P, V>,
    media: MediaService<S>,
    posts: VideoPostService<R, S>,
}

impl<A, P, R, S, V> Backend<A, P, R, S, V> {
    /// Assemble the façade from its ports.
    pub fn new(ports: BackendPorts<A, P, R, S, V>, compensation: UploadCompensation) -> Self {
        let BackendPorts {
            accounts,
            profiles,
            posts,
            storage,
            avatars,
        } = ports;
        let media = MediaService::new(storage);
        Self {
            accounts: AccountService::new(accounts, profiles, avatars),
            posts: VideoPostService::new(posts, media.clone(), compensation),
            media,
        }
    }
}

impl<A, P, R, S, V> Backend<A, P, R, S, V>
where
    A: AccountGateway,
    P: UserProfileRepository,
    R: VideoPostRepository,
    S: FileStorage,
    V: AvatarGenerator,
{
    /// Register an account, sign it in and write its profile document.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<UserProfile, Error> {
        self.accounts.create_user(email, password, username).await
    }

    /// Exchange email and password for a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, Error> {
        self.accounts.sign_in(email, password).await
    }

    /// The account owning the current session.
    pub async fn get_account(&self) -> Result<Account, Error> {
        self.accounts.get_account().await
    }

    /// The signed-in account's profile, or `None` when signed out or orphaned.
    pub async fn get_current_user(&self) -> Result<Option<UserProfile>, Error> {
        self.accounts.get_current_user().await
    }

    /// Delete the current session when there is one.
    pub async fn sign_out(&self) -> Result<SignOutOutcome, Error> {
        self.accounts.sign_out().await
    }

    /// Upload a picked file and return its display URL.
    pub async fn upload_file(
        &self,
        asset: Option<&MediaAsset>,
        kind: FileKind,
    ) -> Result<Option<Url>, Error> {
        self.media.upload_file(asset, kind).await
    }

    /// Display URL of a stored file.
    pub fn get_file_preview(&self, file_id: &FileId, kind: FileKind) -> Result<Url, Error> {
        self.media.get_file_preview(file_id, kind)
    }

    /// Upload a post's media and write the post.
    pub async fn create_video_post(&self, form: &CreateVideoPostForm) -> Result<VideoPost, Error> {
        self.posts.create_video_post(form).await
    }

    /// Every post.
    pub async fn get_all_posts(&self) -> Result<Vec<VideoPost>, Error> {
        self.posts.get_all_posts().await
    }

    /// Posts created by a profile.
    pub async fn get_user_posts(&self, user_id: &DocumentId) -> Result<Vec<VideoPost>, Error> {
        self.posts.get_user_posts(user_id).await
    }

    /// Posts whose title matches `query`.
    pub async fn search_posts(&self, query: &str) -> Result<Vec<VideoPost>, Error> {
        self.posts.search_posts(query).await
    }

    /// The seven newest posts, newest first.
    pub async fn get_latest_posts(&self) -> Result<Vec<VideoPost>, Error> {
        self.posts.get_latest_posts().await
    }
}
