//! Domain primitives, services and the backend façade.
//!
//! Purpose: Define strongly typed records for accounts, profiles, posts and
//! files, the driven ports the services depend on, and the [`Backend`]
//! façade the app calls. Nothing here knows about HTTP or configuration.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — failure returned by every operation.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error category.
//! - Backend (alias to `facade::Backend`) — one method per app use case.

pub mod account;
pub mod account_service;
pub mod auth;
pub mod error;
pub mod facade;
pub mod ids;
pub mod media;
pub mod media_service;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod user;

pub use self::account::{Account, NewAccount, Session, SignOutOutcome};
pub use self::account_service::AccountService;
pub use self::auth::{
    Credentials, CredentialsValidationError, PASSWORD_MAX, PASSWORD_MIN, Registration,
    USERNAME_MAX,
};
pub use self::error::{Error, ErrorCode};
pub use self::facade::{Backend, BackendPorts};
pub use self::ids::{
    AccountId, DocumentId, FileId, ID_MAX_LEN, IdValidationError, ResourceId, SessionId,
};
pub use self::media::{FileKind, Gravity, MediaAsset, PreviewSpec, StoredFile, UploadedFile};
pub use self::media_service::MediaService;
pub use self::post::{
    CreateVideoPostForm, LATEST_POSTS_LIMIT, NewVideoPost, PostCreator, PostQuery, VideoPost,
};
pub use self::post_service::{UploadCompensation, VideoPostService};
pub use self::user::{NewUserProfile, UserProfile};

/// Convenient result alias for façade operations.
///
/// # Examples
/// ```
/// use aora_backend::domain::{BackendResult, Error};
///
/// fn lookup() -> BackendResult<u32> {
///     Err(Error::not_found("nope"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type BackendResult<T> = Result<T, Error>;
