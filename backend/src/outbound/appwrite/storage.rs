//! Appwrite storage bucket adapter.
//!
//! Files larger than [`CHUNK_SIZE`] are sent as consecutive multipart
//! requests carrying a `Content-Range` header; every chunk after the first
//! names the file being assembled with `x-appwrite-id`.

use std::ops::Range;

use async_trait::async_trait;
use reqwest::header::CONTENT_RANGE;
use reqwest::multipart::{Form, Part};
use tracing::debug;
use url::Url;

use super::client::AppwriteClient;
use super::dto::FileDto;
use crate::domain::ports::{FileStorage, FileStorageError};
use crate::domain::{FileId, MediaAsset, PreviewSpec, ResourceId, StoredFile};

/// Largest payload sent in one upload request.
pub const CHUNK_SIZE: usize = 5 * 1024 * 1024;

const UPLOAD_ID_HEADER: &str = "x-appwrite-id";

/// [`FileStorage`] over one Appwrite bucket.
#[derive(Debug, Clone)]
pub struct AppwriteFileStorage {
    client: AppwriteClient,
    bucket: ResourceId,
}

impl AppwriteFileStorage {
    pub fn new(client: AppwriteClient, bucket: ResourceId) -> Self {
        Self { client, bucket }
    }

    fn file_url(
        &self,
        id: &FileId,
        tail: &[&str],
        params: &[(&str, &str)],
    ) -> Result<Url, FileStorageError> {
        let mut segments = vec![
            "storage",
            "buckets",
            self.bucket.as_str(),
            "files",
            id.as_str(),
        ];
        segments.extend_from_slice(tail);
        Ok(self.client.public_url(&segments, params)?)
    }

    fn upload_part(asset: &MediaAsset, range: Range<usize>) -> Result<Part, FileStorageError> {
        let bytes = asset.bytes.get(range.clone()).ok_or_else(|| {
            FileStorageError::rejected(format!(
                "chunk {range:?} exceeds file size {}",
                asset.size()
            ))
        })?;
        Part::bytes(bytes.to_vec())
            .file_name(asset.file_name.clone())
            .mime_str(&asset.mime_type)
            .map_err(|error| {
                FileStorageError::rejected(format!(
                    "invalid mime type {:?}: {error}",
                    asset.mime_type
                ))
            })
    }
}

/// Byte ranges of the upload requests for a payload of `total` bytes.
///
/// A payload that fits in one chunk, including an empty one, is sent whole.
fn chunk_ranges(total: usize, chunk_size: usize) -> Vec<Range<usize>> {
    if total <= chunk_size {
        return vec![0..total];
    }
    (0..total)
        .step_by(chunk_size)
        .map(|start| start..total.min(start + chunk_size))
        .collect()
}

fn content_range(range: &Range<usize>, total: usize) -> String {
    format!("bytes {}-{}/{}", range.start, range.end.saturating_sub(1), total)
}

#[async_trait]
impl FileStorage for AppwriteFileStorage {
    async fn upload(
        &self,
        id: &FileId,
        asset: &MediaAsset,
    ) -> Result<StoredFile, FileStorageError> {
        let url = self.client.url(&["storage", "buckets", self.bucket.as_str(), "files"])?;
        let total = asset.size();
        let ranges = chunk_ranges(total, CHUNK_SIZE);
        let chunked = ranges.len() > 1;

        let mut last = None;
        for (index, range) in ranges.into_iter().enumerate() {
            let form = Form::new()
                .text("fileId", id.as_str().to_owned())
                .part("file", Self::upload_part(asset, range.clone())?);
            let mut request = self.client.post(url.clone()).multipart(form);
            if chunked {
                request = request.header(CONTENT_RANGE, content_range(&range, total));
            }
            if index > 0 {
                request = request.header(UPLOAD_ID_HEADER, id.as_str());
            }
            debug!(file_id = %id, chunk = index, bytes = range.len(), "uploading chunk");
            let dto: FileDto = self.client.send_json("upload_file", request).await?;
            last = Some(dto);
        }

        last.ok_or_else(|| FileStorageError::decode("upload produced no file record"))?
            .into_domain()
            .map_err(FileStorageError::decode)
    }

    async fn delete(&self, id: &FileId) -> Result<(), FileStorageError> {
        let url = self
            .client
            .url(&["storage", "buckets", self.bucket.as_str(), "files", id.as_str()])?;
        self.client
            .send("delete_file", self.client.delete(url))
            .await?;
        Ok(())
    }

    fn view_url(&self, id: &FileId) -> Result<Url, FileStorageError> {
        self.file_url(id, &["view"], &[])
    }

    fn preview_url(&self, id: &FileId, spec: &PreviewSpec) -> Result<Url, FileStorageError> {
        let width = spec.width.to_string();
        let height = spec.height.to_string();
        let quality = spec.quality.to_string();
        self.file_url(
            id,
            &["preview"],
            &[
                ("width", width.as_str()),
                ("height", height.as_str()),
                ("gravity", spec.gravity.as_str()),
                ("quality", quality.as_str()),
            ],
        )
    }
}
