use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::{User, new_id};

use super::{AuthBackend, AuthError, OAuthProvider, OAuthRedirect, check_password, normalize_email};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    user: User,
    salt: String,
    password_digest: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AccountsFile {
    #[serde(default)]
    accounts: Vec<Account>,
}

/// Accounts kept in process, optionally mirrored to a JSON file.
///
/// Passwords are stored as salted BLAKE3 digests.
#[derive(Debug)]
pub struct LocalAuthBackend {
    path: Option<PathBuf>,
    accounts: Vec<Account>,
    authorize_url: String,
    redirect_url: String,
}

impl LocalAuthBackend {
    pub fn in_memory(authorize_url: impl Into<String>, redirect_url: impl Into<String>) -> Self {
        Self {
            path: None,
            accounts: Vec::new(),
            authorize_url: authorize_url.into(),
            redirect_url: redirect_url.into(),
        }
    }

    /// Load accounts from `path`; a missing file starts empty.
    pub fn open(
        path: impl Into<PathBuf>,
        authorize_url: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let path = path.into();
        let accounts = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<AccountsFile>(&text)
                .map_err(|e| backend_err(&path, e))?
                .accounts,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(backend_err(&path, err)),
        };
        debug!(count = accounts.len(), path = %path.display(), "accounts loaded");
        Ok(Self {
            path: Some(path),
            accounts,
            authorize_url: authorize_url.into(),
            redirect_url: redirect_url.into(),
        })
    }

    fn save(&self) -> Result<(), AuthError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| backend_err(path, e))?;
        }
        let file = AccountsFile {
            accounts: self.accounts.clone(),
        };
        let text = serde_json::to_string_pretty(&file).map_err(|e| backend_err(path, e))?;
        fs::write(path, text).map_err(|e| backend_err(path, e))
    }

    fn find(&self, email: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.user.email == email)
    }
}

fn backend_err(path: &Path, err: impl fmt::Display) -> AuthError {
    AuthError::Backend(format!("{}: {err}", path.display()))
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_hex().to_string()
}

impl AuthBackend for LocalAuthBackend {
    fn sign_up(&mut self, email: &str, password: &str, name: &str) -> Result<User, AuthError> {
        let email = normalize_email(email)?;
        check_password(password)?;
        if self.find(&email).is_some() {
            return Err(AuthError::AlreadyRegistered(email));
        }

        let name = match name.trim() {
            "" => email.split('@').next().unwrap_or_default().to_string(),
            name => name.to_string(),
        };
        let user = User::new(new_id(), email, name);
        let salt = new_id();
        self.accounts.push(Account {
            password_digest: digest(&salt, password),
            salt,
            user: user.clone(),
        });
        self.save()?;
        info!(user = %user.id, "account created");
        Ok(user)
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let account = self.find(&email).ok_or(AuthError::InvalidCredentials)?;
        if digest(&account.salt, password) != account.password_digest {
            return Err(AuthError::InvalidCredentials);
        }
        info!(user = %account.user.id, "signed in");
        Ok(account.user.clone())
    }

    fn sign_in_with_oauth(&self, provider: OAuthProvider) -> Result<OAuthRedirect, AuthError> {
        let url = reqwest::Url::parse_with_params(
            &self.authorize_url,
            &[("provider", provider.as_str()), ("redirect_to", self.redirect_url.as_str())],
        )
        .map_err(|e| AuthError::Backend(format!("bad authorize url: {e}")))?;
        Ok(OAuthRedirect {
            provider,
            url: url.into(),
        })
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        debug!(at = %Utc::now(), "signed out");
        Ok(())
    }

    fn fetch_profile(&self, user_id: &str) -> Result<User, AuthError> {
        self.accounts
            .iter()
            .find(|a| a.user.id == user_id)
            .map(|a| a.user.clone())
            .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))
    }
}
