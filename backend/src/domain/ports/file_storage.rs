//! Driven port for the backend's file storage bucket.

use async_trait::async_trait;
use url::Url;

use crate::domain::{FileId, MediaAsset, PreviewSpec, StoredFile};

use super::{classify_backend_failure, define_port_error};

define_port_error! {
    /// Errors surfaced by file storage adapters.
    pub enum FileStorageError {
        /// No session, or the session may not write to the bucket.
        Unauthorized { message: String } => "file storage rejected credentials: {message}",
        /// The file does not exist.
        NotFound { message: String } => "file not found: {message}",
        /// A file with the same id already exists.
        Conflict { message: String } => "file already exists: {message}",
        /// The upload was refused, for example for size or extension.
        Rejected { message: String } => "file storage rejected request: {message}",
        /// Network transport failed or the backend errored.
        Transport { message: String } => "file storage transport failed: {message}",
        /// The response could not be decoded, or a URL could not be built.
        Decode { message: String } => "file storage response decode failed: {message}",
    }
}

classify_backend_failure!(FileStorageError);

/// Port for uploading files and addressing them by URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `asset` under `id`.
    async fn upload(&self, id: &FileId, asset: &MediaAsset)
    -> Result<StoredFile, FileStorageError>;

    /// Delete a stored file.
    async fn delete(&self, id: &FileId) -> Result<(), FileStorageError>;

    /// URL serving the file's original bytes.
    fn view_url(&self, id: &FileId) -> Result<Url, FileStorageError>;

    /// URL serving a resized, cropped preview of an image file.
    fn preview_url(&self, id: &FileId, spec: &PreviewSpec) -> Result<Url, FileStorageError>;
}
