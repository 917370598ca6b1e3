//! Appwrite avatars adapter.

use url::Url;

use super::client::AppwriteClient;
use crate::domain::ports::{AvatarGenerator, AvatarGeneratorError};

/// [`AvatarGenerator`] producing Appwrite initials images.
///
/// The URL is built locally; the image is rendered when first fetched.
#[derive(Debug, Clone)]
pub struct AppwriteAvatars {
    client: AppwriteClient,
}

impl AppwriteAvatars {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }
}

impl AvatarGenerator for AppwriteAvatars {
    fn initials_url(&self, name: &str) -> Result<Url, AvatarGeneratorError> {
        self.client
            .public_url(&["avatars", "initials"], &[("name", name)])
            .map_err(|failure| AvatarGeneratorError::invalid_url(failure.message))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for initials URL construction.

    use std::time::Duration;

    use super::*;
    use crate::domain::ResourceId;

    #[test]
    fn encodes_the_name_into_the_query() {
        let client = AppwriteClient::new(
            Url::parse("https://cloud.appwrite.io/v1").expect("endpoint"),
            ResourceId::new("project1").expect("id"),
            "com.jsm.aora",
            Duration::from_secs(5),
        )
        .expect("client builds");

        let url = AppwriteAvatars::new(client)
            .initials_url("Zoë & Co")
            .expect("url builds");

        assert_eq!(url.path(), "/v1/avatars/initials");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("name".to_owned(), "Zoë & Co".to_owned()),
                ("project".to_owned(), "project1".to_owned()),
            ]
        );
    }
}
