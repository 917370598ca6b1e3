//! Appwrite document adapters for the user and video collections.

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use super::client::{AppwriteClient, AppwriteFailure};
use super::dto::{
    CreateDocumentBody, DocumentListDto, UserDocumentData, UserDocumentDto, VideoDocumentData,
    VideoDocumentDto,
};
use super::query;
use crate::domain::ports::{
    UserProfileRepository, UserProfileRepositoryError, VideoPostRepository,
    VideoPostRepositoryError,
};
use crate::domain::{
    AccountId, NewUserProfile, NewVideoPost, PostQuery, ResourceId, UserProfile, VideoPost,
};

const ACCOUNT_ID: &str = "accountId";

/// Database and collection a repository reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRef {
    pub database: ResourceId,
    pub collection: ResourceId,
}

impl CollectionRef {
    pub fn new(database: ResourceId, collection: ResourceId) -> Self {
        Self {
            database,
            collection,
        }
    }

    fn documents_url(&self, client: &AppwriteClient) -> Result<Url, AppwriteFailure> {
        client.url(&[
            "databases",
            self.database.as_str(),
            "collections",
            self.collection.as_str(),
            "documents",
        ])
    }
}

/// [`UserProfileRepository`] over the users collection.
#[derive(Debug, Clone)]
pub struct AppwriteUserProfileRepository {
    client: AppwriteClient,
    users: CollectionRef,
}

impl AppwriteUserProfileRepository {
    pub fn new(client: AppwriteClient, users: CollectionRef) -> Self {
        Self { client, users }
    }
}

#[async_trait]
impl UserProfileRepository for AppwriteUserProfileRepository {
    async fn create(
        &self,
        profile: &NewUserProfile,
    ) -> Result<UserProfile, UserProfileRepositoryError> {
        let body = CreateDocumentBody {
            document_id: profile.id.as_str(),
            data: UserDocumentData {
                account_id: profile.account_id.as_str(),
                email: profile.email.as_str(),
                username: profile.username.as_str(),
                avatar: profile.avatar.as_str(),
            },
        };
        let url = self.users.documents_url(&self.client)?;
        let dto: UserDocumentDto = self
            .client
            .send_json("create_user_document", self.client.post(url).json(&body))
            .await?;
        dto.into_domain().map_err(UserProfileRepositoryError::decode)
    }

    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        let url = self.users.documents_url(&self.client)?;
        let params = query::as_params(vec![query::equal(ACCOUNT_ID, account_id.as_str())]);
        let list: DocumentListDto<UserDocumentDto> = self
            .client
            .send_json("list_user_documents", self.client.get(url).query(&params))
            .await?;
        if list.total > 1 {
            warn!(%account_id, total = list.total, "several user documents share one account");
        }
        list.documents
            .into_iter()
            .next()
            .map(UserDocumentDto::into_domain)
            .transpose()
            .map_err(UserProfileRepositoryError::decode)
    }
}

/// [`VideoPostRepository`] over the videos collection.
#[derive(Debug, Clone)]
pub struct AppwriteVideoPostRepository {
    client: AppwriteClient,
    videos: CollectionRef,
}

impl AppwriteVideoPostRepository {
    pub fn new(client: AppwriteClient, videos: CollectionRef) -> Self {
        Self { client, videos }
    }
}

#[async_trait]
impl VideoPostRepository for AppwriteVideoPostRepository {
    async fn create(&self, post: &NewVideoPost) -> Result<VideoPost, VideoPostRepositoryError> {
        let body = CreateDocumentBody {
            document_id: post.id.as_str(),
            data: VideoDocumentData {
                title: post.title.as_str(),
                thumbnail: post.thumbnail.as_str(),
                video: post.video.as_str(),
                prompt: post.prompt.as_str(),
                creator: post.creator.as_str(),
            },
        };
        let url = self.videos.documents_url(&self.client)?;
        let dto: VideoDocumentDto = self
            .client
            .send_json("create_video_document", self.client.post(url).json(&body))
            .await?;
        dto.into_domain().map_err(VideoPostRepositoryError::decode)
    }

    async fn list(&self, filter: &PostQuery) -> Result<Vec<VideoPost>, VideoPostRepositoryError> {
        let url = self.videos.documents_url(&self.client)?;
        let params = query::as_params(query::post_queries(filter));
        let list: DocumentListDto<VideoDocumentDto> = self
            .client
            .send_json("list_video_documents", self.client.get(url).query(&params))
            .await?;
        debug!(
            total = list.total,
            returned = list.documents.len(),
            "video documents listed"
        );
        Ok(decode_posts(list.documents))
    }
}

/// Maps listed documents to posts, dropping any that fail to decode.
///
/// A post whose creator relationship was nulled stays in the collection; it
/// must not hide every other post from the feed.
fn decode_posts(documents: Vec<VideoDocumentDto>) -> Vec<VideoPost> {
    documents
        .into_iter()
        .filter_map(|dto| {
            let post_id = dto.id().to_owned();
            dto.into_domain()
                .map_err(|error| {
                    warn!(
                        post_id = %post_id,
                        error = %error,
                        "skipping undecodable video document"
                    );
                })
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network document helpers.

    use std::time::Duration;

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn video_document(id: &str, creator: serde_json::Value) -> serde_json::Value {
        json!({
            "$id": id,
            "$createdAt": "2024-11-09T12:00:00.000+00:00",
            "title": format!("title of {id}"),
            "thumbnail": "https://cloud.appwrite.io/v1/storage/buckets/b/files/t1/preview?project=p",
            "video": "https://cloud.appwrite.io/v1/storage/buckets/b/files/v1/view?project=p",
            "prompt": "",
            "creator": creator
        })
    }

    #[rstest]
    #[case::null_creator(serde_json::Value::Null)]
    #[case::invalid_creator_id(json!(""))]
    fn listing_skips_undecodable_posts(#[case] broken_creator: serde_json::Value) {
        let list: DocumentListDto<VideoDocumentDto> = serde_json::from_value(json!({
            "total": 3,
            "documents": [
                video_document("post1", json!("profile1")),
                video_document("post2", broken_creator),
                video_document("post3", json!({ "$id": "profile2", "username": "bob" })),
            ]
        }))
        .expect("list decodes");

        let posts = decode_posts(list.documents);

        let ids: Vec<_> = posts.iter().map(|post| post.id.as_str()).collect();
        assert_eq!(ids, vec!["post1", "post3"]);
    }

    #[test]
    fn documents_url_nests_database_and_collection() {
        let client = AppwriteClient::new(
            Url::parse("https://cloud.appwrite.io/v1").expect("endpoint"),
            ResourceId::new("project1").expect("id"),
            "com.jsm.aora",
            Duration::from_secs(5),
        )
        .expect("client builds");
        let videos = CollectionRef::new(
            ResourceId::new("672ea2bc00127d41f8e3").expect("id"),
            ResourceId::new("672ea373000fd9eec9fd").expect("id"),
        );

        let url = videos.documents_url(&client).expect("url builds");

        assert_eq!(
            url.as_str(),
            "https://cloud.appwrite.io/v1/databases/672ea2bc00127d41f8e3/collections/672ea373000fd9eec9fd/documents"
        );
    }
}
