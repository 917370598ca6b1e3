//! Appwrite outbound adapters.
//!
//! Thin reqwest implementations of the account, document, storage and avatar
//! ports. Build one [`AppwriteClient`] and hand clones of it to every
//! adapter so they share the session cookie.

mod account;
mod avatars;
mod client;
mod databases;
mod dto;
mod query;
mod storage;

pub use account::AppwriteAccountGateway;
pub use avatars::AppwriteAvatars;
pub use client::{AppwriteClient, AppwriteClientError, AppwriteFailure, RESPONSE_FORMAT};
pub use databases::{AppwriteUserProfileRepository, AppwriteVideoPostRepository, CollectionRef};
pub use storage::{AppwriteFileStorage, CHUNK_SIZE};
