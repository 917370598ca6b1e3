//! In-memory port fakes for integration tests.
//!
//! [`InMemoryAppwrite`] implements every driven port over one shared state,
//! so a [`Backend`] assembled from it behaves like one Appwrite project:
//! signing in through the account port authenticates later calls, and files
//! and documents written through one port are visible through the others.
//! Compiled only with the `test-support` feature.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use url::Url;

use crate::domain::ports::{
    AccountGateway, AccountGatewayError, AvatarGenerator, AvatarGeneratorError, FileStorage,
    FileStorageError, UserProfileRepository, UserProfileRepositoryError, VideoPostRepository,
    VideoPostRepositoryError,
};
use crate::domain::{
    Account, AccountId, Backend, BackendPorts, Credentials, DocumentId, FileId, MediaAsset,
    NewAccount, NewUserProfile, NewVideoPost, PostCreator, PostQuery, PreviewSpec, Session,
    SessionId, StoredFile, UploadCompensation, UserProfile, VideoPost,
};

const BASE_URL: &str = "https://appwrite.test/v1";

/// Façade served entirely by [`InMemoryAppwrite`].
pub type InMemoryBackend = Backend<
    InMemoryAppwrite,
    InMemoryAppwrite,
    InMemoryAppwrite,
    InMemoryAppwrite,
    InMemoryAppwrite,
>;

#[derive(Debug, Default)]
struct State {
    accounts: Vec<(Account, String)>,
    session: Option<Session>,
    users: Vec<UserProfile>,
    posts: Vec<VideoPost>,
    files: HashMap<FileId, StoredFile>,
    rejected_mime_prefix: Option<String>,
    fail_profile_writes: bool,
    fail_post_writes: bool,
}

/// One fake Appwrite project.
#[derive(Debug, Default)]
pub struct InMemoryAppwrite {
    state: Mutex<State>,
}

impl InMemoryAppwrite {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reject uploads whose mime type starts with `prefix`.
    pub fn reject_uploads_of(&self, prefix: &str) {
        self.state().rejected_mime_prefix = Some(prefix.to_owned());
    }

    /// Fail every user document write with a transport error.
    pub fn fail_profile_writes(&self) {
        self.state().fail_profile_writes = true;
    }

    /// Fail every video document write as invalid.
    pub fn fail_post_writes(&self) {
        self.state().fail_post_writes = true;
    }

    /// Register an account without signing it in.
    pub fn seed_account(&self, email: &str, password: &str, name: &str) -> Account {
        let account = Account {
            id: AccountId::unique(),
            email: email.to_owned(),
            name: name.to_owned(),
            created_at: Utc::now(),
        };
        self.state()
            .accounts
            .push((account.clone(), password.to_owned()));
        account
    }

    /// Store a post with an explicit creation time.
    pub fn seed_post(
        &self,
        title: &str,
        creator: &DocumentId,
        created_at: DateTime<Utc>,
    ) -> VideoPost {
        let id = DocumentId::unique();
        let post = VideoPost {
            thumbnail: file_url(&FileId::unique(), "preview"),
            video: file_url(&FileId::unique(), "view"),
            title: title.to_owned(),
            prompt: format!("prompt for {title}"),
            creator: PostCreator::id_only(creator.clone()),
            created_at,
            id,
        };
        self.state().posts.push(post.clone());
        post
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.state()
            .accounts
            .iter()
            .map(|(account, _)| account.clone())
            .collect()
    }

    pub fn users(&self) -> Vec<UserProfile> {
        self.state().users.clone()
    }

    pub fn posts(&self) -> Vec<VideoPost> {
        self.state().posts.clone()
    }

    pub fn files(&self) -> Vec<StoredFile> {
        self.state().files.values().cloned().collect()
    }

    pub fn session(&self) -> Option<Session> {
        self.state().session.clone()
    }
}

/// Assemble a façade whose every port is `fake`.
pub fn in_memory_backend(
    fake: &Arc<InMemoryAppwrite>,
    compensation: UploadCompensation,
) -> InMemoryBackend {
    Backend::new(
        BackendPorts {
            accounts: Arc::clone(fake),
            profiles: Arc::clone(fake),
            posts: Arc::clone(fake),
            storage: Arc::clone(fake),
            avatars: Arc::clone(fake),
        },
        compensation,
    )
}

fn file_url(id: &FileId, tail: &str) -> Url {
    let raw = format!("{BASE_URL}/storage/buckets/test/files/{id}/{tail}");
    Url::parse(&raw).unwrap_or_else(|error| panic!("fake file url {raw:?} is invalid: {error}"))
}

fn title_matches(title: &str, query: &str) -> bool {
    let title = title.to_lowercase();
    query
        .split_whitespace()
        .all(|word| title.contains(&word.to_lowercase()))
}

#[async_trait]
impl AccountGateway for InMemoryAppwrite {
    async fn create_account(&self, account: &NewAccount) -> Result<Account, AccountGatewayError> {
        let mut state = self.state();
        if state
            .accounts
            .iter()
            .any(|(existing, _)| existing.email == account.credentials.email())
        {
            return Err(AccountGatewayError::conflict("user_already_exists"));
        }
        let created = Account {
            id: account.id.clone(),
            email: account.credentials.email().to_owned(),
            name: account.name.clone(),
            created_at: Utc::now(),
        };
        state
            .accounts
            .push((created.clone(), account.credentials.password().to_owned()));
        Ok(created)
    }

    async fn create_email_session(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, AccountGatewayError> {
        let mut state = self.state();
        let account_id = state
            .accounts
            .iter()
            .find(|(account, password)| {
                account.email == credentials.email() && password == credentials.password()
            })
            .map(|(account, _)| account.id.clone())
            .ok_or_else(|| AccountGatewayError::unauthorized("user_invalid_credentials"))?;
        let session = Session {
            id: SessionId::unique(),
            account_id,
            expires_at: Utc::now() + Duration::days(365),
            current: true,
        };
        state.session = Some(session.clone());
        Ok(session)
    }

    async fn current_account(&self) -> Result<Account, AccountGatewayError> {
        let state = self.state();
        let session = state
            .session
            .as_ref()
            .ok_or_else(|| AccountGatewayError::unauthorized("general_unauthorized_scope"))?;
        state
            .accounts
            .iter()
            .find(|(account, _)| account.id == session.account_id)
            .map(|(account, _)| account.clone())
            .ok_or_else(|| AccountGatewayError::not_found("user_not_found"))
    }

    async fn current_session(&self) -> Result<Session, AccountGatewayError> {
        self.state()
            .session
            .clone()
            .ok_or_else(|| AccountGatewayError::unauthorized("general_unauthorized_scope"))
    }

    async fn delete_current_session(&self) -> Result<(), AccountGatewayError> {
        self.state()
            .session
            .take()
            .map(|_| ())
            .ok_or_else(|| AccountGatewayError::unauthorized("general_unauthorized_scope"))
    }
}

#[async_trait]
impl UserProfileRepository for InMemoryAppwrite {
    async fn create(
        &self,
        profile: &NewUserProfile,
    ) -> Result<UserProfile, UserProfileRepositoryError> {
        let mut state = self.state();
        if state.fail_profile_writes {
            return Err(UserProfileRepositoryError::transport("status 503"));
        }
        let created = profile.clone().into_profile();
        state.users.push(created.clone());
        Ok(created)
    }

    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|user| &user.account_id == account_id)
            .cloned())
    }
}

#[async_trait]
impl VideoPostRepository for InMemoryAppwrite {
    async fn create(&self, post: &NewVideoPost) -> Result<VideoPost, VideoPostRepositoryError> {
        let mut state = self.state();
        if state.fail_post_writes {
            return Err(VideoPostRepositoryError::rejected(
                "document_invalid_structure",
            ));
        }
        let creator = state
            .users
            .iter()
            .find(|user| user.id == post.creator)
            .map_or_else(
                || PostCreator::id_only(post.creator.clone()),
                |user| PostCreator {
                    id: user.id.clone(),
                    username: Some(user.username.clone()),
                    avatar: Some(user.avatar.clone()),
                },
            );
        let created = VideoPost {
            id: post.id.clone(),
            title: post.title.clone(),
            thumbnail: post.thumbnail.clone(),
            video: post.video.clone(),
            prompt: post.prompt.clone(),
            creator,
            created_at: Utc::now(),
        };
        state.posts.push(created.clone());
        Ok(created)
    }

    async fn list(&self, query: &PostQuery) -> Result<Vec<VideoPost>, VideoPostRepositoryError> {
        let posts = self.state().posts.clone();
        Ok(match query {
            PostQuery::All => posts,
            PostQuery::ByCreator(creator) => posts
                .into_iter()
                .filter(|post| &post.creator.id == creator)
                .collect(),
            PostQuery::TitleSearch(text) => posts
                .into_iter()
                .filter(|post| title_matches(&post.title, text))
                .collect(),
            PostQuery::Latest { limit } => {
                let mut sorted = posts;
                sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                sorted.truncate(usize::try_from(*limit).unwrap_or(usize::MAX));
                sorted
            }
        })
    }
}

#[async_trait]
impl FileStorage for InMemoryAppwrite {
    async fn upload(
        &self,
        id: &FileId,
        asset: &MediaAsset,
    ) -> Result<StoredFile, FileStorageError> {
        let mut state = self.state();
        if state
            .rejected_mime_prefix
            .as_deref()
            .is_some_and(|prefix| asset.mime_type.starts_with(prefix))
        {
            return Err(FileStorageError::rejected("storage_file_type_unsupported"));
        }
        if state.files.contains_key(id) {
            return Err(FileStorageError::conflict("storage_file_already_exists"));
        }
        let stored = StoredFile {
            id: id.clone(),
            name: asset.file_name.clone(),
            mime_type: asset.mime_type.clone(),
            size: asset.size() as u64,
        };
        state.files.insert(id.clone(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: &FileId) -> Result<(), FileStorageError> {
        self.state()
            .files
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| FileStorageError::not_found("storage_file_not_found"))
    }

    fn view_url(&self, id: &FileId) -> Result<Url, FileStorageError> {
        Ok(file_url(id, "view"))
    }

    fn preview_url(&self, id: &FileId, spec: &PreviewSpec) -> Result<Url, FileStorageError> {
        let mut url = file_url(id, "preview");
        url.query_pairs_mut()
            .append_pair("width", &spec.width.to_string())
            .append_pair("height", &spec.height.to_string())
            .append_pair("gravity", spec.gravity.as_str())
            .append_pair("quality", &spec.quality.to_string());
        Ok(url)
    }
}

impl AvatarGenerator for InMemoryAppwrite {
    fn initials_url(&self, name: &str) -> Result<Url, AvatarGeneratorError> {
        Url::parse_with_params(&format!("{BASE_URL}/avatars/initials"), &[("name", name)])
            .map_err(|error| AvatarGeneratorError::invalid_url(error.to_string()))
    }
}
