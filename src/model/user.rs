use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage quota granted to new accounts (1 GiB).
pub const DEFAULT_STORAGE_LIMIT: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Basic,
    Pro,
}

impl SubscriptionPlan {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Pro => "pro",
        }
    }
}

/// Cached copy of the authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub subscription_plan: SubscriptionPlan,
    /// Bytes used.
    #[serde(default)]
    pub storage_used: u64,
    /// Bytes allowed.
    #[serde(default = "default_storage_limit")]
    pub storage_limit: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_storage_limit() -> u64 {
    DEFAULT_STORAGE_LIMIT
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            avatar_url: None,
            subscription_plan: SubscriptionPlan::Free,
            storage_used: 0,
            storage_limit: DEFAULT_STORAGE_LIMIT,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn storage_remaining(&self) -> u64 {
        self.storage_limit.saturating_sub(self.storage_used)
    }
}
