//! Video post domain service.
//!
//! Creating a post uploads the thumbnail and the video concurrently and only
//! writes the document once both uploads have succeeded. What happens to a
//! file that uploaded when the operation fails anyway is decided by
//! [`UploadCompensation`].

use std::sync::Arc;

use futures_util::future::join;
use tracing::{debug, info};

use crate::domain::ports::{FileStorage, VideoPostRepository, VideoPostRepositoryError};
use crate::domain::{
    CreateVideoPostForm, DocumentId, Error, FileKind, MediaService, NewVideoPost, PostQuery,
    UploadedFile, VideoPost,
};

fn map_repository_error(context: &str, error: VideoPostRepositoryError) -> Error {
    Error::from_backend(error.failure(), context, error)
}

/// Policy for files uploaded by a post creation that did not complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadCompensation {
    /// Leave uploaded files in storage.
    #[default]
    Retain,
    /// Delete uploaded files that no document references.
    DeleteOrphans,
}

/// Service behind the post-facing façade operations.
pub struct VideoPostService<R, S> {
    posts: Arc<R>,
    media: MediaService<S>,
    compensation: UploadCompensation,
}

impl<R, S> VideoPostService<R, S> {
    /// Create a new service over the post repository and media service.
    pub fn new(posts: Arc<R>, media: MediaService<S>, compensation: UploadCompensation) -> Self {
        Self {
            posts,
            media,
            compensation,
        }
    }
}

impl<R, S> VideoPostService<R, S>
where
    R: VideoPostRepository,
    S: FileStorage,
{
    /// Upload both files, then write the post document.
    pub async fn create_video_post(&self, form: &CreateVideoPostForm) -> Result<VideoPost, Error> {
        form.validate()?;

        let (thumbnail, video) = join(
            self.media.upload(&form.thumbnail, FileKind::Image),
            self.media.upload(&form.video, FileKind::Video),
        )
        .await;

        let (thumbnail, video) = match (thumbnail, video) {
            (Ok(thumbnail), Ok(video)) => (thumbnail, video),
            (thumbnail, video) => {
                let uploaded: Vec<UploadedFile> = [&thumbnail, &video]
                    .into_iter()
                    .filter_map(|result| result.as_ref().ok().cloned())
                    .collect();
                self.compensate(&uploaded).await;
                let error = thumbnail
                    .err()
                    .or_else(|| video.err())
                    .unwrap_or_else(|| Error::upload_failed("failed to upload post media"));
                return Err(error);
            }
        };

        let post = NewVideoPost {
            id: DocumentId::unique(),
            title: form.title.trim().to_owned(),
            thumbnail: thumbnail.url.clone(),
            video: video.url.clone(),
            prompt: form.prompt.clone(),
            creator: form.user_id.clone(),
        };
        debug!(post_id = %post.id, creator = %post.creator, "writing video post");

        match self.posts.create(&post).await {
            Ok(created) => {
                info!(post_id = %created.id, "video post created");
                Ok(created)
            }
            Err(err) => {
                self.compensate(&[thumbnail, video]).await;
                Err(map_repository_error("failed to create video post", err))
            }
        }
    }

    async fn compensate(&self, uploaded: &[UploadedFile]) {
        match self.compensation {
            UploadCompensation::Retain => {
                for file in uploaded {
                    debug!(file_id = %file.id, "retaining upload of failed post");
                }
            }
            UploadCompensation::DeleteOrphans => {
                for file in uploaded {
                    self.media.discard(&file.id).await;
                }
            }
        }
    }

    /// Every post.
    pub async fn get_all_posts(&self) -> Result<Vec<VideoPost>, Error> {
        self.list(&PostQuery::All, "failed to list posts").await
    }

    /// Posts created by the profile `user_id`.
    pub async fn get_user_posts(&self, user_id: &DocumentId) -> Result<Vec<VideoPost>, Error> {
        self.list(
            &PostQuery::ByCreator(user_id.clone()),
            "failed to list user posts",
        )
        .await
    }

    /// Posts whose title matches `query` under the backend's full-text search.
    pub async fn search_posts(&self, query: &str) -> Result<Vec<VideoPost>, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::validation_failed("search query must not be empty"));
        }
        self.list(
            &PostQuery::TitleSearch(query.to_owned()),
            "failed to search posts",
        )
        .await
    }

    /// The newest posts, newest first.
    pub async fn get_latest_posts(&self) -> Result<Vec<VideoPost>, Error> {
        self.list(&PostQuery::latest(), "failed to list latest posts")
            .await
    }

    async fn list(&self, query: &PostQuery, context: &str) -> Result<Vec<VideoPost>, Error> {
        let posts = self
            .posts
            .list(query)
            .await
            .map_err(|err| map_repository_error(context, err))?;
        debug!(?query, count = posts.len(), "listed video posts");
        Ok(posts)
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
