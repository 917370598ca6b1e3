//! Port abstraction for the video posts collection.
//!
//! The domain owns the filter vocabulary ([`PostQuery`]); adapters translate
//! it into whatever query syntax the backend speaks.

use async_trait::async_trait;

use crate::domain::{NewVideoPost, PostQuery, VideoPost};

use super::{classify_backend_failure, define_port_error};

define_port_error! {
    /// Errors raised by video post repository adapters.
    pub enum VideoPostRepositoryError {
        /// No session, or the session may not access the collection.
        Unauthorized { message: String } => "video post access denied: {message}",
        /// The collection does not exist.
        NotFound { message: String } => "video post collection not found: {message}",
        /// A document with the same id already exists.
        Conflict { message: String } => "video post already exists: {message}",
        /// The document or query was refused, for example a search on an
        /// attribute without a full-text index.
        Rejected { message: String } => "video post request rejected: {message}",
        /// Network transport failed or the backend errored.
        Transport { message: String } => "video post repository transport failed: {message}",
        /// The response could not be decoded.
        Decode { message: String } => "video post decode failed: {message}",
    }
}

classify_backend_failure!(VideoPostRepositoryError);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoPostRepository: Send + Sync {
    /// Write a new post document.
    async fn create(&self, post: &NewVideoPost) -> Result<VideoPost, VideoPostRepositoryError>;

    /// List posts matching `query`. An empty match is an empty vector.
    async fn list(&self, query: &PostQuery) -> Result<Vec<VideoPost>, VideoPostRepositoryError>;
}
