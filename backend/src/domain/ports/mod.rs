//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Every driven port here fronts one service of the managed backend
//! (accounts, documents, file storage, avatars). Each trait exposes a
//! strongly typed error so adapters map transport failures into predictable
//! variants, and services map those variants into [`crate::domain::Error`].

mod macros;
pub(crate) use macros::{classify_backend_failure, define_port_error};

mod account_gateway;
mod avatar_generator;
mod file_storage;
mod user_profile_repository;
mod video_post_repository;

#[cfg(test)]
pub use account_gateway::MockAccountGateway;
pub use account_gateway::{AccountGateway, AccountGatewayError};
#[cfg(test)]
pub use avatar_generator::MockAvatarGenerator;
pub use avatar_generator::{AvatarGenerator, AvatarGeneratorError};
#[cfg(test)]
pub use file_storage::MockFileStorage;
pub use file_storage::{FileStorage, FileStorageError};
#[cfg(test)]
pub use user_profile_repository::MockUserProfileRepository;
pub use user_profile_repository::{UserProfileRepository, UserProfileRepositoryError};
#[cfg(test)]
pub use video_post_repository::MockVideoPostRepository;
pub use video_post_repository::{VideoPostRepository, VideoPostRepositoryError};

/// Failure category shared by every backend-facing port error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendFailure {
    /// Credentials rejected or no session.
    Unauthorized,
    /// The addressed record does not exist.
    NotFound,
    /// A record with the same id or unique key already exists.
    Conflict,
    /// The backend refused the request as invalid.
    Rejected,
    /// Network failure, timeout, rate limit or server error.
    Transport,
    /// The response could not be decoded.
    Decode,
}
