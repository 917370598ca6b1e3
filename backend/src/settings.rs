//! Appwrite project configuration loaded via OrthoConfig.
//!
//! [`AppwriteSettings`] is the raw layered input (CLI flags, `AORA_*`
//! environment variables, configuration files). [`AppwriteConfig`] is the
//! validated form handed to [`crate::wiring::appwrite_backend`].

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{IdValidationError, ResourceId, UploadCompensation};

const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";
const DEFAULT_PLATFORM: &str = "com.jsm.aora";
const DEFAULT_PROJECT_ID: &str = "672ea0b10009e86a071e";
const DEFAULT_STORAGE_ID: &str = "672ea70d0020b7fec7c7";
const DEFAULT_DATABASE_ID: &str = "672ea2bc00127d41f8e3";
const DEFAULT_USER_COLLECTION_ID: &str = "672ea2e7000616cf38af";
const DEFAULT_VIDEO_COLLECTION_ID: &str = "672ea373000fd9eec9fd";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Layered Appwrite settings. Every field falls back to the application's
/// registered project.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "AORA")]
pub struct AppwriteSettings {
    /// API endpoint including the version path.
    pub endpoint: Option<String>,
    /// Application id registered as a platform on the project.
    pub platform: Option<String>,
    /// Project id.
    pub project_id: Option<String>,
    /// Storage bucket holding thumbnails and videos.
    pub storage_id: Option<String>,
    /// Database holding the user and video collections.
    pub database_id: Option<String>,
    /// Collection of user profile documents.
    pub user_collection_id: Option<String>,
    /// Collection of video post documents.
    pub video_collection_id: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Delete uploads left behind by a failed post creation.
    #[ortho_config(default = false)]
    pub delete_orphaned_uploads: bool,
}

impl AppwriteSettings {
    /// Return the configured endpoint, falling back to Appwrite Cloud.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Return the configured platform id.
    pub fn platform(&self) -> &str {
        self.platform.as_deref().unwrap_or(DEFAULT_PLATFORM)
    }

    pub fn project_id(&self) -> &str {
        self.project_id.as_deref().unwrap_or(DEFAULT_PROJECT_ID)
    }

    pub fn storage_id(&self) -> &str {
        self.storage_id.as_deref().unwrap_or(DEFAULT_STORAGE_ID)
    }

    pub fn database_id(&self) -> &str {
        self.database_id.as_deref().unwrap_or(DEFAULT_DATABASE_ID)
    }

    pub fn user_collection_id(&self) -> &str {
        self.user_collection_id
            .as_deref()
            .unwrap_or(DEFAULT_USER_COLLECTION_ID)
    }

    pub fn video_collection_id(&self) -> &str {
        self.video_collection_id
            .as_deref()
            .unwrap_or(DEFAULT_VIDEO_COLLECTION_ID)
    }

    /// Return the request timeout, falling back to thirty seconds.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

/// Errors raised while validating [`AppwriteSettings`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The endpoint is not a URL.
    #[error("endpoint {value:?} is not a valid URL: {source}")]
    InvalidEndpoint {
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// The endpoint is a URL but not an HTTP one.
    #[error("endpoint {value:?} must use http or https")]
    UnsupportedScheme { value: String },
    /// The platform id is blank.
    #[error("platform must not be empty")]
    EmptyPlatform,
    /// A resource id does not follow the backend's id rules.
    #[error("{field} is invalid: {source}")]
    InvalidId {
        field: &'static str,
        #[source]
        source: IdValidationError,
    },
    /// A zero timeout would fail every request.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Validated Appwrite project configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppwriteConfig {
    pub endpoint: Url,
    pub platform: String,
    pub project: ResourceId,
    pub bucket: ResourceId,
    pub database: ResourceId,
    pub user_collection: ResourceId,
    pub video_collection: ResourceId,
    pub request_timeout: Duration,
    pub upload_compensation: UploadCompensation,
}

fn resource_id(field: &'static str, raw: &str) -> Result<ResourceId, ConfigError> {
    ResourceId::new(raw.trim()).map_err(|source| ConfigError::InvalidId { field, source })
}

impl AppwriteConfig {
    /// Validate layered settings.
    ///
    /// # Examples
    /// ```
    /// use aora_backend::settings::{AppwriteConfig, AppwriteSettings};
    /// use ortho_config::OrthoConfig;
    ///
    /// let settings = AppwriteSettings::load_from_iter([std::ffi::OsString::from("aora")]).unwrap();
    /// let config = AppwriteConfig::from_settings(&settings).unwrap();
    /// assert!(matches!(config.endpoint.scheme(), "http" | "https"));
    /// ```
    pub fn from_settings(settings: &AppwriteSettings) -> Result<Self, ConfigError> {
        let raw_endpoint = settings.endpoint().trim();
        let endpoint =
            Url::parse(raw_endpoint).map_err(|source| ConfigError::InvalidEndpoint {
                value: raw_endpoint.to_owned(),
                source,
            })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                value: raw_endpoint.to_owned(),
            });
        }

        let platform = settings.platform().trim();
        if platform.is_empty() {
            return Err(ConfigError::EmptyPlatform);
        }

        let request_timeout = settings.request_timeout();
        if request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            endpoint,
            platform: platform.to_owned(),
            project: resource_id("project_id", settings.project_id())?,
            bucket: resource_id("storage_id", settings.storage_id())?,
            database: resource_id("database_id", settings.database_id())?,
            user_collection: resource_id("user_collection_id", settings.user_collection_id())?,
            video_collection: resource_id("video_collection_id", settings.video_collection_id())?,
            request_timeout,
            upload_compensation: if settings.delete_orphaned_uploads {
                UploadCompensation::DeleteOrphans
            } else {
                UploadCompensation::Retain
            },
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for Appwrite configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "AORA_ENDPOINT",
        "AORA_PLATFORM",
        "AORA_PROJECT_ID",
        "AORA_STORAGE_ID",
        "AORA_DATABASE_ID",
        "AORA_USER_COLLECTION_ID",
        "AORA_VIDEO_COLLECTION_ID",
        "AORA_REQUEST_TIMEOUT_SECS",
        "AORA_DELETE_ORPHANED_UPLOADS",
    ];

    fn unset() -> AppwriteSettings {
        AppwriteSettings {
            endpoint: None,
            platform: None,
            project_id: None,
            storage_id: None,
            database_id: None,
            user_collection_id: None,
            video_collection_id: None,
            request_timeout_secs: None,
            delete_orphaned_uploads: false,
        }
    }

    fn load_from_empty_args() -> AppwriteSettings {
        AppwriteSettings::load_from_iter([OsString::from("aora")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let config = AppwriteConfig::from_settings(&load_from_empty_args())
            .expect("defaults are valid");

        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.platform, DEFAULT_PLATFORM);
        assert_eq!(config.project.as_str(), DEFAULT_PROJECT_ID);
        assert_eq!(config.bucket.as_str(), DEFAULT_STORAGE_ID);
        assert_eq!(config.database.as_str(), DEFAULT_DATABASE_ID);
        assert_eq!(config.user_collection.as_str(), DEFAULT_USER_COLLECTION_ID);
        assert_eq!(config.video_collection.as_str(), DEFAULT_VIDEO_COLLECTION_ID);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.upload_compensation, UploadCompensation::Retain);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("AORA_ENDPOINT", Some("http://localhost/v1".to_owned())),
            ("AORA_PLATFORM", None::<String>),
            ("AORA_PROJECT_ID", Some("local-project".to_owned())),
            ("AORA_STORAGE_ID", None::<String>),
            ("AORA_DATABASE_ID", None::<String>),
            ("AORA_USER_COLLECTION_ID", None::<String>),
            ("AORA_VIDEO_COLLECTION_ID", Some("videos".to_owned())),
            ("AORA_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
            ("AORA_DELETE_ORPHANED_UPLOADS", Some("true".to_owned())),
        ]);

        let config = AppwriteConfig::from_settings(&load_from_empty_args())
            .expect("overrides are valid");

        assert_eq!(config.endpoint.as_str(), "http://localhost/v1");
        assert_eq!(config.project.as_str(), "local-project");
        assert_eq!(config.video_collection.as_str(), "videos");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(
            config.upload_compensation,
            UploadCompensation::DeleteOrphans
        );
    }

    #[rstest]
    #[case::not_a_url("cloud appwrite", "is not a valid URL")]
    #[case::wrong_scheme("ftp://cloud.appwrite.io/v1", "must use http or https")]
    fn invalid_endpoints_are_rejected(#[case] endpoint: &str, #[case] expected: &str) {
        let settings = AppwriteSettings {
            endpoint: Some(endpoint.to_owned()),
            ..unset()
        };
        let error = AppwriteConfig::from_settings(&settings).expect_err("endpoint invalid");
        assert!(error.to_string().contains(expected), "{error}");
    }

    #[rstest]
    fn invalid_resource_ids_name_their_field() {
        let settings = AppwriteSettings {
            database_id: Some("_hidden".to_owned()),
            ..unset()
        };
        let error = AppwriteConfig::from_settings(&settings).expect_err("id invalid");
        assert_eq!(
            error,
            ConfigError::InvalidId {
                field: "database_id",
                source: IdValidationError::LeadingSpecialCharacter,
            }
        );
    }

    #[rstest]
    fn zero_timeout_is_rejected() {
        let settings = AppwriteSettings {
            request_timeout_secs: Some(0),
            ..unset()
        };
        assert_eq!(
            AppwriteConfig::from_settings(&settings),
            Err(ConfigError::ZeroTimeout)
        );
    }
}
