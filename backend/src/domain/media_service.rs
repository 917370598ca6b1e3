//! File upload and display-URL resolution.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::domain::ports::{BackendFailure, FileStorage, FileStorageError};
use crate::domain::{Error, FileId, FileKind, MediaAsset, PreviewSpec, UploadedFile};

fn map_upload_error(error: FileStorageError) -> Error {
    match error.failure() {
        BackendFailure::Unauthorized => {
            Error::from_backend(BackendFailure::Unauthorized, "upload not permitted", error)
        }
        _ => Error::upload_failed("failed to upload file").with_cause(error),
    }
}

/// Service behind the upload and preview façade operations.
pub struct MediaService<S> {
    storage: Arc<S>,
}

impl<S> Clone for MediaService<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S> MediaService<S> {
    /// Create a new service over the file storage port.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

impl<S> MediaService<S>
where
    S: FileStorage,
{
    /// Upload `asset` and return its display URL.
    ///
    /// A missing asset is not an error: nothing is uploaded and `None` is
    /// returned.
    pub async fn upload_file(
        &self,
        asset: Option<&MediaAsset>,
        kind: FileKind,
    ) -> Result<Option<Url>, Error> {
        let Some(asset) = asset else {
            return Ok(None);
        };
        let uploaded = self.upload(asset, kind).await?;
        Ok(Some(uploaded.url))
    }

    /// Upload `asset` under a fresh id and resolve its display URL.
    pub async fn upload(&self, asset: &MediaAsset, kind: FileKind) -> Result<UploadedFile, Error> {
        let id = FileId::unique();
        debug!(
            file_id = %id,
            file_name = %asset.file_name,
            mime_type = %asset.mime_type,
            size = asset.size(),
            %kind,
            "uploading file"
        );
        let stored = self
            .storage
            .upload(&id, asset)
            .await
            .map_err(map_upload_error)?;
        let url = self.get_file_preview(&stored.id, kind)?;
        Ok(UploadedFile { id: stored.id, url })
    }

    /// Display URL of a stored file.
    ///
    /// Videos resolve to the direct view URL; images to a preview bounded by
    /// [`PreviewSpec::THUMBNAIL`].
    pub fn get_file_preview(&self, file_id: &FileId, kind: FileKind) -> Result<Url, Error> {
        let url = match kind {
            FileKind::Video => self.storage.view_url(file_id),
            FileKind::Image => self.storage.preview_url(file_id, &PreviewSpec::THUMBNAIL),
        };
        url.map_err(|err| Error::from_backend(err.failure(), "failed to resolve file url", err))
    }

    /// Delete a file that no document references. Failures are logged only.
    pub async fn discard(&self, file_id: &FileId) {
        match self.storage.delete(file_id).await {
            Ok(()) => debug!(%file_id, "discarded orphaned upload"),
            Err(err) => warn!(%file_id, error = %err, "failed to discard orphaned upload"),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockFileStorage;
    use crate::domain::{ErrorCode, StoredFile};
    use rstest::{fixture, rstest};

    const BASE: &str = "https://cloud.appwrite.io/v1/storage/buckets/bucket1/files";

    #[fixture]
    fn asset() -> MediaAsset {
        MediaAsset {
            file_name: "thumb.png".to_owned(),
            mime_type: "image/png".to_owned(),
            bytes: vec![137, 80, 78, 71],
        }
    }

    fn storage_with_urls() -> MockFileStorage {
        let mut storage = MockFileStorage::new();
        storage
            .expect_view_url()
            .returning(|id| Ok(Url::parse(&format!("{BASE}/{id}/view")).expect("url")));
        storage.expect_preview_url().returning(|id, spec| {
            Ok(Url::parse(&format!(
                "{BASE}/{id}/preview?width={}&height={}",
                spec.width, spec.height
            ))
            .expect("url"))
        });
        storage
    }

    #[rstest]
    #[tokio::test]
    async fn missing_asset_uploads_nothing() {
        let mut storage = MockFileStorage::new();
        storage.expect_upload().times(0);
        let service = MediaService::new(Arc::new(storage));

        let url = service
            .upload_file(None, FileKind::Image)
            .await
            .expect("no-op succeeds");

        assert!(url.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn image_upload_resolves_preview_url(asset: MediaAsset) {
        let mut storage = storage_with_urls();
        storage
            .expect_upload()
            .times(1)
            .withf(|_, asset| asset.mime_type == "image/png")
            .returning(|id, asset| {
                Ok(StoredFile {
                    id: id.clone(),
                    name: asset.file_name.clone(),
                    mime_type: asset.mime_type.clone(),
                    size: asset.size() as u64,
                })
            });
        let service = MediaService::new(Arc::new(storage));

        let url = service
            .upload_file(Some(&asset), FileKind::Image)
            .await
            .expect("upload succeeds")
            .expect("url present");

        assert!(url.path().ends_with("/preview"));
        assert_eq!(url.query(), Some("width=2000&height=2000"));
    }

    #[rstest]
    fn image_and_video_urls_differ_for_same_file() {
        let service = MediaService::new(Arc::new(storage_with_urls()));
        let id = FileId::new("file1").expect("valid id");

        let image = service
            .get_file_preview(&id, FileKind::Image)
            .expect("image url");
        let video = service
            .get_file_preview(&id, FileKind::Video)
            .expect("video url");

        assert_ne!(image, video);
        assert!(video.path().ends_with("/file1/view"));
    }

    #[rstest]
    #[case(FileStorageError::rejected("storage_file_type_unsupported"), ErrorCode::UploadFailed)]
    #[case(FileStorageError::transport("timeout"), ErrorCode::UploadFailed)]
    #[case(FileStorageError::unauthorized("no session"), ErrorCode::AuthFailed)]
    #[tokio::test]
    async fn upload_failures_are_classified(
        asset: MediaAsset,
        #[case] failure: FileStorageError,
        #[case] expected: ErrorCode,
    ) {
        let mut storage = MockFileStorage::new();
        storage
            .expect_upload()
            .return_once(move |_, _| Err(failure));
        let service = MediaService::new(Arc::new(storage));

        let error = service
            .upload(&asset, FileKind::Image)
            .await
            .expect_err("upload fails");

        assert_eq!(error.code(), expected);
        assert!(error.cause().is_some());
    }
}
