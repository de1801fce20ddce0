use tracing::warn;

use crate::model::User;
use crate::session::{AUTH_STORAGE_KEY, PersistedAuth, SessionFile};

use super::observer::{SubscriptionId, Subscribers};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// A sign-in or profile fetch is in flight.
    pub is_loading: bool,
}

/// The signed-in user, mirrored to the session file when one is attached.
#[derive(Debug, Default)]
pub struct AuthStore {
    state: AuthState,
    session: Option<SessionFile>,
    subscribers: Subscribers<AuthState>,
}

impl AuthStore {
    /// A store with no persistence.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Restore the last persisted user. Unreadable data starts signed out.
    pub fn restore(session: SessionFile) -> Self {
        let persisted = match session.load::<PersistedAuth>(AUTH_STORAGE_KEY) {
            Ok(state) => state.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable session");
                PersistedAuth::default()
            }
        };
        let is_authenticated = persisted.is_authenticated && persisted.user.is_some();
        Self {
            state: AuthState {
                user: persisted.user.filter(|_| is_authenticated),
                is_authenticated,
                is_loading: false,
            },
            session: Some(session),
            subscribers: Subscribers::default(),
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&AuthState) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Set or clear the user; `is_authenticated` follows.
    pub fn set_user(&mut self, user: Option<User>) {
        self.state.is_authenticated = user.is_some();
        self.state.user = user;
        self.persist();
        self.subscribers.notify(&self.state);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.state.is_loading = loading;
        self.subscribers.notify(&self.state);
    }

    /// Forget the user and drop the persisted blob.
    pub fn logout(&mut self) {
        self.state.user = None;
        self.state.is_authenticated = false;
        if let Some(session) = &self.session {
            if let Err(err) = session.remove(AUTH_STORAGE_KEY) {
                warn!(error = %err, "failed to clear session");
            }
        }
        self.subscribers.notify(&self.state);
    }

    fn persist(&self) {
        let Some(session) = &self.session else {
            return;
        };
        let snapshot = PersistedAuth {
            user: self.state.user.clone(),
            is_authenticated: self.state.is_authenticated,
        };
        if let Err(err) = session.save(AUTH_STORAGE_KEY, &snapshot) {
            warn!(error = %err, "failed to persist session");
        }
    }
}
