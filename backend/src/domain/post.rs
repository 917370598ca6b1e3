//! Video post documents and the queries the feed screens issue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{DocumentId, Error, MediaAsset};

/// Number of posts returned by the "latest" feed.
pub const LATEST_POSTS_LIMIT: u32 = 7;

/// Creator reference carried by a post.
///
/// The backend returns the creator relationship either as a bare document id
/// or expanded into the creator's profile; `username` and `avatar` are only
/// present in the expanded form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCreator {
    pub id: DocumentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Url>,
}

impl PostCreator {
    /// Creator known only by document id.
    pub fn id_only(id: DocumentId) -> Self {
        Self {
            id,
            username: None,
            avatar: None,
        }
    }
}

/// Video post document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPost {
    pub id: DocumentId,
    pub title: String,
    pub thumbnail: Url,
    pub video: Url,
    pub prompt: String,
    pub creator: PostCreator,
    pub created_at: DateTime<Utc>,
}

/// Post document to be written by the post repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideoPost {
    pub id: DocumentId,
    pub title: String,
    pub thumbnail: Url,
    pub video: Url,
    pub prompt: String,
    pub creator: DocumentId,
}

/// Input of the create-post screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVideoPostForm {
    pub title: String,
    pub prompt: String,
    pub thumbnail: MediaAsset,
    pub video: MediaAsset,
    /// Profile document id of the author.
    pub user_id: DocumentId,
}

impl CreateVideoPostForm {
    /// Reject forms the backend would refuse before any upload starts.
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::validation_failed("post title must not be empty"));
        }
        if self.thumbnail.bytes.is_empty() {
            return Err(Error::validation_failed("thumbnail file must not be empty"));
        }
        if self.video.bytes.is_empty() {
            return Err(Error::validation_failed("video file must not be empty"));
        }
        Ok(())
    }
}

/// Filter applied when listing posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostQuery {
    /// Every post, in backend order.
    All,
    /// Posts whose `creator` equals the profile id.
    ByCreator(DocumentId),
    /// Full-text search on `title`.
    TitleSearch(String),
    /// Newest first, capped at `limit`.
    Latest { limit: u32 },
}

impl PostQuery {
    /// The "latest" feed query.
    pub const fn latest() -> Self {
        Self::Latest {
            limit: LATEST_POSTS_LIMIT,
        }
    }
}
