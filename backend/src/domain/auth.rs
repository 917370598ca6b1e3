//! Authentication primitives such as sign-in credentials and registrations.
//!
//! Keep raw input parsing outside the services by exposing constructors that
//! validate string inputs before a service talks to a port.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use zeroize::Zeroizing;

/// Minimum password length accepted by the backend.
pub const PASSWORD_MIN: usize = 8;
/// Maximum password length accepted by the backend.
pub const PASSWORD_MAX: usize = 256;
/// Maximum username length accepted by the backend.
pub const USERNAME_MAX: usize = 128;

/// Validation errors returned when sign-in or registration input is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsValidationError {
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email is not shaped like `local@domain.tld`.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Password is shorter than [`PASSWORD_MIN`] or longer than [`PASSWORD_MAX`].
    #[error("password must be between {min} and {max} characters")]
    PasswordLength { min: usize, max: usize },
    /// Username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username is longer than [`USERNAME_MAX`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated email and password pair.
///
/// ## Invariants
/// - `email` is trimmed and matches `local@domain.tld`.
/// - `password` keeps caller-provided whitespace and is between
///   [`PASSWORD_MIN`] and [`PASSWORD_MAX`] characters.
///
/// # Examples
/// ```
/// use aora_backend::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" ada@example.com ", "hunter22").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }
        if !email_regex().is_match(email) {
            return Err(CredentialsValidationError::InvalidEmail);
        }

        let length = password.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) {
            return Err(CredentialsValidationError::PasswordLength {
                min: PASSWORD_MIN,
                max: PASSWORD_MAX,
            });
        }

        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated sign-up request: credentials plus the public username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: Credentials,
    username: String,
}

impl Registration {
    /// Construct a registration from raw inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let credentials = Credentials::try_from_parts(email, password)?;
        let username = username.trim();
        if username.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(CredentialsValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self {
            credentials,
            username: username.to_owned(),
        })
    }

    /// Sign-in credentials for the new account.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Trimmed username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }
}
