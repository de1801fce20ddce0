use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// Free-form job settings, e.g. `{"model": "full"}` or `{"genre": "jazz"}`.
pub type ProjectSettings = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Separation,
    Generation,
}

impl ProjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Separation => "separation",
            Self::Generation => "generation",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Processing,
    Completed,
    Failed,
}

impl ProjectStatus {
    /// `true` once the job can no longer change.
    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Processing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Record of one separation or generation job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProjectKind,
    pub status: ProjectStatus,
    #[serde(default)]
    pub input_file_url: String,
    #[serde(default)]
    pub input_file_name: String,
    /// Output locators keyed by stem or variant name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub output_files: BTreeMap<String, String>,
    /// Stems the backend failed to produce, when a job only partly succeeded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_stems: Vec<String>,
    #[serde(default)]
    pub settings: ProjectSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a project in the `processing` state.
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, kind: ProjectKind) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            user_id: user_id.into(),
            name: name.into(),
            kind,
            status: ProjectStatus::Processing,
            input_file_url: String::new(),
            input_file_name: String::new(),
            output_files: BTreeMap::new(),
            failed_stems: Vec::new(),
            settings: ProjectSettings::new(),
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_input(mut self, url: impl Into<String>, file_name: impl Into<String>) -> Self {
        self.input_file_url = url.into();
        self.input_file_name = file_name.into();
        self
    }

    pub fn with_output(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.output_files.insert(name.into(), url.into());
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Look up a string setting.
    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(|v| v.as_str())
    }
}

/// The mutable fields of a [`Project`].
///
/// Applying any patch refreshes `updated_at`; `id`, owner, kind and
/// `created_at` cannot be patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub output_files: Option<BTreeMap<String, String>>,
    pub failed_stems: Option<Vec<String>>,
    pub settings: Option<ProjectSettings>,
    /// `Some(None)` clears a previous error.
    pub error: Option<Option<String>>,
}

impl ProjectPatch {
    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Mark the project failed with `message`.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Some(ProjectStatus::Failed),
            error: Some(Some(message.into())),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(output_files) = &self.output_files {
            project.output_files = output_files.clone();
        }
        if let Some(failed_stems) = &self.failed_stems {
            project.failed_stems = failed_stems.clone();
        }
        if let Some(settings) = &self.settings {
            project.settings = settings.clone();
        }
        if let Some(error) = &self.error {
            project.error = error.clone();
        }
        project.updated_at = Utc::now();
    }
}
