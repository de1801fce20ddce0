//! Account sign-up, sign-in and profile lookup.
//!
//! [`AuthBackend`] is the contract a hosted identity service satisfies.
//! [`LocalAuthBackend`] implements it against a JSON accounts file so the
//! application works without one.

mod local;

pub use local::*;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::User;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email address `{0}`")]
    InvalidEmail(String),
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("an account already exists for {0}")]
    AlreadyRegistered(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("no user with id {0}")]
    UserNotFound(String),
    #[error("auth backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    Google,
    GitHub,
}

impl OAuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::GitHub => "github",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "github" => Ok(Self::GitHub),
            other => Err(format!("unsupported provider `{other}`")),
        }
    }
}

/// Where to send the user to finish an OAuth sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthRedirect {
    pub provider: OAuthProvider,
    pub url: String,
}

pub trait AuthBackend {
    fn sign_up(&mut self, email: &str, password: &str, name: &str) -> Result<User, AuthError>;
    fn sign_in(&mut self, email: &str, password: &str) -> Result<User, AuthError>;
    fn sign_in_with_oauth(&self, provider: OAuthProvider) -> Result<OAuthRedirect, AuthError>;
    fn sign_out(&mut self) -> Result<(), AuthError>;
    fn fetch_profile(&self, user_id: &str) -> Result<User, AuthError>;
}

/// Trimmed, lowercased email if it looks like `local@domain`.
pub fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(email)
        }
        _ => Err(AuthError::InvalidEmail(email)),
    }
}

pub fn check_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}
