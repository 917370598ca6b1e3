//! Driven port for generated avatars.

use url::Url;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while building avatar URLs.
    pub enum AvatarGeneratorError {
        /// The configured endpoint cannot address the avatar route.
        InvalidUrl { message: String } => "avatar url could not be built: {message}",
    }
}

/// Port producing avatar image URLs.
///
/// URLs are built locally; the image itself is rendered by the backend when
/// the client loads it.
#[cfg_attr(test, mockall::automock)]
pub trait AvatarGenerator: Send + Sync {
    /// URL of an image showing the initials of `name`.
    fn initials_url(&self, name: &str) -> Result<Url, AvatarGeneratorError>;
}
