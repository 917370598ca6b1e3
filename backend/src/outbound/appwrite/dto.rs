//! DTOs for Appwrite request bodies and JSON responses.
//!
//! Responses decode into these transport DTOs first, then map into domain
//! records in one pass. Identifier and URL validation happens during that
//! mapping, so a malformed record surfaces as a decode failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{
    Account, DocumentId, IdValidationError, PostCreator, Session, StoredFile, UserProfile,
    VideoPost,
};

fn parse_id<T>(field: &str, raw: &str) -> Result<T, String>
where
    T: TryFrom<String, Error = IdValidationError>,
{
    T::try_from(raw.to_owned()).map_err(|error| format!("{field} {raw:?} is invalid: {error}"))
}

fn parse_url(field: &str, raw: &str) -> Result<Url, String> {
    Url::parse(raw).map_err(|error| format!("{field} {raw:?} is not a URL: {error}"))
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    error_type: String,
}

impl ErrorBodyDto {
    pub(super) fn describe(self) -> String {
        match (self.error_type.is_empty(), self.message.is_empty()) {
            (true, _) => self.message,
            (false, true) => self.error_type,
            (false, false) => format!("{}: {}", self.error_type, self.message),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AccountDto {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "$createdAt")]
    created_at: DateTime<Utc>,
    email: String,
    #[serde(default)]
    name: String,
}

impl AccountDto {
    pub(super) fn into_domain(self) -> Result<Account, String> {
        Ok(Account {
            id: parse_id("account id", &self.id)?,
            email: self.email,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SessionDto {
    #[serde(rename = "$id")]
    id: String,
    user_id: String,
    expire: DateTime<Utc>,
    #[serde(default)]
    current: bool,
}

impl SessionDto {
    pub(super) fn into_domain(self) -> Result<Session, String> {
        Ok(Session {
            id: parse_id("session id", &self.id)?,
            account_id: parse_id("session user id", &self.user_id)?,
            expires_at: self.expire,
            current: self.current,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DocumentListDto<T> {
    #[serde(default)]
    pub(super) total: u64,
    pub(super) documents: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserDocumentDto {
    #[serde(rename = "$id")]
    id: String,
    account_id: String,
    email: String,
    username: String,
    avatar: String,
}

impl UserDocumentDto {
    pub(super) fn into_domain(self) -> Result<UserProfile, String> {
        Ok(UserProfile {
            id: parse_id("user document id", &self.id)?,
            account_id: parse_id("user account id", &self.account_id)?,
            email: self.email,
            username: self.username,
            avatar: parse_url("user avatar", &self.avatar)?,
        })
    }
}

/// A relationship attribute arrives either as the related document's id or
/// as the related document itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum CreatorDto {
    Id(String),
    Expanded(CreatorDocumentDto),
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatorDocumentDto {
    #[serde(rename = "$id")]
    id: String,
    username: Option<String>,
    avatar: Option<String>,
}

impl CreatorDto {
    fn into_domain(self) -> Result<PostCreator, String> {
        match self {
            Self::Id(id) => Ok(PostCreator::id_only(parse_id("post creator", &id)?)),
            Self::Expanded(creator) => Ok(PostCreator {
                id: parse_id("post creator", &creator.id)?,
                username: creator.username,
                avatar: creator
                    .avatar
                    .as_deref()
                    .map(|raw| parse_url("creator avatar", raw))
                    .transpose()?,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct VideoDocumentDto {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "$createdAt")]
    created_at: DateTime<Utc>,
    title: String,
    thumbnail: String,
    video: String,
    #[serde(default)]
    prompt: Option<String>,
    creator: Option<CreatorDto>,
}

impl VideoDocumentDto {
    pub(super) fn id(&self) -> &str {
        &self.id
    }

    pub(super) fn into_domain(self) -> Result<VideoPost, String> {
        let id: DocumentId = parse_id("post id", &self.id)?;
        let creator = self
            .creator
            .ok_or_else(|| format!("post {id} has no creator"))?
            .into_domain()?;
        Ok(VideoPost {
            title: self.title,
            thumbnail: parse_url("post thumbnail", &self.thumbnail)?,
            video: parse_url("post video", &self.video)?,
            prompt: self.prompt.unwrap_or_default(),
            creator,
            created_at: self.created_at,
            id,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FileDto {
    #[serde(rename = "$id")]
    id: String,
    name: String,
    mime_type: String,
    size_original: u64,
}

impl FileDto {
    pub(super) fn into_domain(self) -> Result<StoredFile, String> {
        Ok(StoredFile {
            id: parse_id("file id", &self.id)?,
            name: self.name,
            mime_type: self.mime_type,
            size: self.size_original,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateAccountBody<'a> {
    pub(super) user_id: &'a str,
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) name: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct EmailSessionBody<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateDocumentBody<'a, T> {
    pub(super) document_id: &'a str,
    pub(super) data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserDocumentData<'a> {
    pub(super) account_id: &'a str,
    pub(super) email: &'a str,
    pub(super) username: &'a str,
    pub(super) avatar: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct VideoDocumentData<'a> {
    pub(super) title: &'a str,
    pub(super) thumbnail: &'a str,
    pub(super) video: &'a str,
    pub(super) prompt: &'a str,
    pub(super) creator: &'a str,
}
