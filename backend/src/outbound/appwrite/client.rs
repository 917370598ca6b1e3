//! Reqwest client shared by every Appwrite adapter.
//!
//! The client owns transport details only: default project headers, the
//! cookie jar holding the session, URL construction under the configured
//! endpoint, and mapping of HTTP failures into [`BackendFailure`] categories.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, ORIGIN};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::dto::ErrorBodyDto;
use crate::domain::ResourceId;
use crate::domain::ports::{
    AccountGatewayError, BackendFailure, FileStorageError, UserProfileRepositoryError,
    VideoPostRepositoryError,
};

/// Response format the DTOs are written against.
pub const RESPONSE_FORMAT: &str = "1.5.0";

const PROJECT_HEADER: &str = "x-appwrite-project";
const RESPONSE_FORMAT_HEADER: &str = "x-appwrite-response-format";

/// Errors raised while building an [`AppwriteClient`].
#[derive(Debug, Error)]
pub enum AppwriteClientError {
    /// A configured value cannot be sent as an HTTP header.
    #[error("invalid value for header {header}: {source}")]
    InvalidHeader {
        header: &'static str,
        #[source]
        source: InvalidHeaderValue,
    },
    /// The endpoint cannot have path segments appended.
    #[error("endpoint {endpoint} cannot be used as a base URL")]
    InvalidEndpoint { endpoint: Url },
    /// The underlying reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Classified failure of one Appwrite call.
///
/// Each adapter converts it into its own port error with `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppwriteFailure {
    pub kind: BackendFailure,
    pub message: String,
}

impl AppwriteFailure {
    pub(crate) fn new(kind: BackendFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::new(BackendFailure::Decode, message)
    }
}

macro_rules! impl_from_failure {
    ($($port_error:ty),* $(,)?) => {
        $(
            impl From<AppwriteFailure> for $port_error {
                fn from(failure: AppwriteFailure) -> Self {
                    let AppwriteFailure { kind, message } = failure;
                    match kind {
                        BackendFailure::Unauthorized => Self::unauthorized(message),
                        BackendFailure::NotFound => Self::not_found(message),
                        BackendFailure::Conflict => Self::conflict(message),
                        BackendFailure::Rejected => Self::rejected(message),
                        BackendFailure::Transport => Self::transport(message),
                        BackendFailure::Decode => Self::decode(message),
                    }
                }
            }
        )*
    };
}

impl_from_failure!(
    AccountGatewayError,
    FileStorageError,
    UserProfileRepositoryError,
    VideoPostRepositoryError,
);

/// Connection to one Appwrite project.
///
/// Cloning is cheap and every clone shares the connection pool and the
/// cookie jar, so a session opened through one adapter authenticates the
/// others.
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    http: Client,
    endpoint: Url,
    project: ResourceId,
}

impl AppwriteClient {
    /// Build a client for `project` under `endpoint`.
    ///
    /// `platform` is the application id registered with the project; it is
    /// sent as the request origin.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint cannot be a base URL, a header
    /// value is invalid, or the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        project: ResourceId,
        platform: &str,
        timeout: Duration,
    ) -> Result<Self, AppwriteClientError> {
        if endpoint.cannot_be_a_base() {
            return Err(AppwriteClientError::InvalidEndpoint { endpoint });
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(PROJECT_HEADER),
            header_value(PROJECT_HEADER, project.as_str())?,
        );
        headers.insert(
            HeaderName::from_static(RESPONSE_FORMAT_HEADER),
            HeaderValue::from_static(RESPONSE_FORMAT),
        );
        headers.insert(
            ORIGIN,
            header_value("origin", &format!("appwrite-android://{platform}"))?,
        );

        let http = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint,
            project,
        })
    }

    /// Project the client is bound to.
    pub fn project(&self) -> &ResourceId {
        &self.project
    }

    /// API URL for `segments` under the endpoint, keeping its base path.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, AppwriteFailure> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppwriteFailure::decode(format!(
                    "endpoint {} cannot be used as a base URL",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL a client without headers can fetch: the project travels in the
    /// query string after `params`.
    pub(crate) fn public_url(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<Url, AppwriteFailure> {
        let mut url = self.url(segments)?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("project", self.project.as_str());
        Ok(url)
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.http.get(url)
    }

    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        self.http.post(url)
    }

    pub(crate) fn delete(&self, url: Url) -> RequestBuilder {
        self.http.delete(url)
    }

    /// Send `request` and decode a JSON success body.
    pub(crate) async fn send_json<T>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, AppwriteFailure>
    where
        T: DeserializeOwned,
    {
        let body = self.send(operation, request).await?;
        decode_json(&body)
    }

    /// Send `request` and return the raw success body.
    pub(crate) async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Vec<u8>, AppwriteFailure> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(
            operation,
            status = status.as_u16(),
            bytes = body.len(),
            "appwrite call finished"
        );
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

fn header_value(header: &'static str, raw: &str) -> Result<HeaderValue, AppwriteClientError> {
    HeaderValue::from_str(raw).map_err(|source| AppwriteClientError::InvalidHeader { header, source })
}

pub(crate) fn decode_json<T>(body: &[u8]) -> Result<T, AppwriteFailure>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|error| {
        AppwriteFailure::decode(format!("invalid Appwrite JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> AppwriteFailure {
    let message = if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    };
    AppwriteFailure::new(BackendFailure::Transport, message)
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AppwriteFailure {
    let detail = serde_json::from_slice::<ErrorBodyDto>(body)
        .map(ErrorBodyDto::describe)
        .unwrap_or_else(|_| body_preview(body));
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), detail)
    };

    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendFailure::Unauthorized,
        StatusCode::NOT_FOUND => BackendFailure::NotFound,
        StatusCode::CONFLICT => BackendFailure::Conflict,
        StatusCode::TOO_MANY_REQUESTS => BackendFailure::Transport,
        _ if status.is_client_error() => BackendFailure::Rejected,
        _ => BackendFailure::Transport,
    };
    AppwriteFailure::new(kind, message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network client helpers.

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn client() -> AppwriteClient {
        AppwriteClient::new(
            Url::parse("https://cloud.appwrite.io/v1").expect("endpoint"),
            ResourceId::new("672ea0b10009e86a071e").expect("project id"),
            "com.jsm.aora",
            Duration::from_secs(5),
        )
        .expect("client builds")
    }

    #[rstest]
    fn api_urls_keep_the_endpoint_base_path(client: AppwriteClient) {
        let url = client
            .url(&["account", "sessions", "current"])
            .expect("url builds");
        assert_eq!(
            url.as_str(),
            "https://cloud.appwrite.io/v1/account/sessions/current"
        );
    }

    #[rstest]
    fn trailing_slash_on_endpoint_is_not_doubled() {
        let client = AppwriteClient::new(
            Url::parse("https://appwrite.example.test/v1/").expect("endpoint"),
            ResourceId::new("project1").expect("project id"),
            "com.jsm.aora",
            Duration::from_secs(5),
        )
        .expect("client builds");

        let url = client.url(&["account"]).expect("url builds");
        assert_eq!(url.as_str(), "https://appwrite.example.test/v1/account");
    }

    #[rstest]
    fn public_urls_carry_the_project_last(client: AppwriteClient) {
        let url = client
            .public_url(&["avatars", "initials"], &[("name", "ada lovelace")])
            .expect("url builds");
        assert_eq!(
            url.as_str(),
            "https://cloud.appwrite.io/v1/avatars/initials?name=ada+lovelace&project=672ea0b10009e86a071e"
        );
    }

    #[rstest]
    fn segments_are_percent_encoded(client: AppwriteClient) {
        let url = client.url(&["storage", "a/b"]).expect("url builds");
        assert!(url.path().ends_with("/storage/a%2Fb"));
    }

    #[test]
    fn rejects_endpoints_that_cannot_be_a_base() {
        let error = AppwriteClient::new(
            Url::parse("mailto:ops@example.test").expect("url"),
            ResourceId::new("project1").expect("project id"),
            "com.jsm.aora",
            Duration::from_secs(5),
        )
        .expect_err("mailto is not a base");
        assert!(matches!(error, AppwriteClientError::InvalidEndpoint { .. }));
    }

    #[test]
    fn rejects_platforms_that_are_not_header_safe() {
        let error = AppwriteClient::new(
            Url::parse("https://cloud.appwrite.io/v1").expect("url"),
            ResourceId::new("project1").expect("project id"),
            "com.jsm.aora\n",
            Duration::from_secs(5),
        )
        .expect_err("newline is not header safe");
        assert!(matches!(
            error,
            AppwriteClientError::InvalidHeader {
                header: "origin",
                ..
            }
        ));
    }

    #[rstest]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, BackendFailure::Unauthorized)]
    #[case::forbidden(StatusCode::FORBIDDEN, BackendFailure::Unauthorized)]
    #[case::not_found(StatusCode::NOT_FOUND, BackendFailure::NotFound)]
    #[case::conflict(StatusCode::CONFLICT, BackendFailure::Conflict)]
    #[case::bad_request(StatusCode::BAD_REQUEST, BackendFailure::Rejected)]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, BackendFailure::Transport)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, BackendFailure::Transport)]
    #[case::unavailable(StatusCode::SERVICE_UNAVAILABLE, BackendFailure::Transport)]
    fn maps_http_statuses_to_backend_failures(
        #[case] status: StatusCode,
        #[case] expected: BackendFailure,
    ) {
        let failure = map_status_error(status, b"");
        assert_eq!(failure.kind, expected);
        assert_eq!(failure.message, format!("status {}", status.as_u16()));
    }

    #[test]
    fn status_message_uses_appwrite_error_type() {
        let body = br#"{"message":"Invalid credentials. Please check the email and password.","code":401,"type":"user_invalid_credentials","version":"1.6.0"}"#;
        let failure = map_status_error(StatusCode::UNAUTHORIZED, body);
        assert_eq!(
            failure.message,
            "status 401: user_invalid_credentials: Invalid credentials. Please check the email and password."
        );
    }

    #[test]
    fn status_message_falls_back_to_body_preview() {
        let body = "<html>\n  bad   gateway\n</html>".as_bytes();
        let failure = map_status_error(StatusCode::BAD_GATEWAY, body);
        assert_eq!(failure.message, "status 502: <html> bad gateway </html>");
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn failures_convert_into_port_errors() {
        let error: FileStorageError =
            AppwriteFailure::new(BackendFailure::Conflict, "storage_file_already_exists").into();
        assert_eq!(error.failure(), BackendFailure::Conflict);
        assert!(error.to_string().contains("storage_file_already_exists"));
    }

    #[test]
    fn undecodable_json_is_a_decode_failure() {
        let failure = decode_json::<ErrorBodyDto>(b"not json").expect_err("decode fails");
        assert_eq!(failure.kind, BackendFailure::Decode);
    }
}
