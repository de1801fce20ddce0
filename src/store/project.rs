use crate::model::{Project, ProjectPatch};

use super::Outcome;
use super::observer::{SubscriptionId, Subscribers};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectState {
    pub projects: Vec<Project>,
    /// Id of the project open in the detail view.
    pub current_id: Option<String>,
}

impl ProjectState {
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn current(&self) -> Option<&Project> {
        self.current_id.as_deref().and_then(|id| self.project(id))
    }
}

/// Separation and generation jobs, newest first.
#[derive(Debug, Default)]
pub struct ProjectStore {
    state: ProjectState,
    subscribers: Subscribers<ProjectState>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            state: ProjectState {
                projects,
                current_id: None,
            },
            subscribers: Subscribers::default(),
        }
    }

    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    pub fn projects(&self) -> &[Project] {
        &self.state.projects
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.state.project(id)
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.state.current()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ProjectState) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Replace all projects. A current selection that no longer exists is cleared.
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.state.projects = projects;
        if self.state.current().is_none() {
            self.state.current_id = None;
        }
        self.changed();
    }

    pub fn add_project(&mut self, project: Project) {
        self.state.projects.insert(0, project);
        self.changed();
    }

    pub fn update_project(&mut self, id: &str, patch: &ProjectPatch) -> Outcome {
        let Some(project) = self.state.projects.iter_mut().find(|p| p.id == id) else {
            return Outcome::Absent;
        };
        patch.apply_to(project);
        self.changed();
        Outcome::Applied
    }

    pub fn delete_project(&mut self, id: &str) -> Outcome {
        let Some(index) = self.state.projects.iter().position(|p| p.id == id) else {
            return Outcome::Absent;
        };
        self.state.projects.remove(index);
        if self.state.current_id.as_deref() == Some(id) {
            self.state.current_id = None;
        }
        self.changed();
        Outcome::Applied
    }

    /// Select a project by id, or clear the selection with `None`.
    pub fn set_current_project(&mut self, id: Option<&str>) -> Outcome {
        match id {
            Some(id) if self.state.project(id).is_none() => Outcome::Absent,
            id => {
                self.state.current_id = id.map(str::to_string);
                self.changed();
                Outcome::Applied
            }
        }
    }

    fn changed(&mut self) {
        self.subscribers.notify(&self.state);
    }
}
