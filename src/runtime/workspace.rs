use std::error::Error;
use std::path::PathBuf;

use tracing::debug;

use crate::auth::{AuthError, LocalAuthBackend};
use crate::config::Settings;
use crate::library::{CatalogFile, CatalogSnapshot, LibraryError};
use crate::session::SessionFile;
use crate::storage::LocalObjectStore;
use crate::store::{AuthStore, LibraryStore, ProjectStore};

const ACCOUNTS_FILE_NAME: &str = "accounts.json";

/// Owner id used for records created while signed out.
pub const LOCAL_OWNER: &str = "local";

/// Everything persisted under the data directory, opened together.
pub struct Workspace {
    pub data_dir: PathBuf,
    pub library: LibraryStore,
    pub projects: ProjectStore,
    pub auth: AuthStore,
    pub objects: LocalObjectStore,
    catalog: CatalogFile,
}

impl Workspace {
    pub fn open(settings: &Settings) -> Result<Self, LibraryError> {
        let data_dir = settings.data_dir();
        let catalog = CatalogFile::in_dir(&data_dir);
        let (library, projects) = catalog.load()?.into_stores();
        let auth = AuthStore::restore(SessionFile::in_dir(&data_dir));
        let objects = LocalObjectStore::new(data_dir.join("objects"), settings.storage.bucket.clone());
        debug!(data_dir = %data_dir.display(), "workspace opened");
        Ok(Self {
            data_dir,
            library,
            projects,
            auth,
            objects,
            catalog,
        })
    }

    /// The signed-in user's id, or [`LOCAL_OWNER`].
    pub fn owner_id(&self) -> String {
        self.auth
            .user()
            .map(|u| u.id.clone())
            .unwrap_or_else(|| LOCAL_OWNER.to_string())
    }

    pub fn accounts(&self, settings: &Settings) -> Result<LocalAuthBackend, AuthError> {
        LocalAuthBackend::open(
            self.data_dir.join(ACCOUNTS_FILE_NAME),
            settings.auth.authorize_url.clone(),
            settings.auth.redirect_url.clone(),
        )
    }

    /// Where the terminal player logs when no log file is configured.
    pub fn log_path(settings: &Settings) -> PathBuf {
        settings.data_dir().join("musicflow.log")
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        self.catalog
            .save(&CatalogSnapshot::capture(&self.library, &self.projects))?;
        Ok(())
    }
}
