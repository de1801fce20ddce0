//! Observable record holders for the library, projects and the signed-in user.
//!
//! Stores are plain owned values. Mutations happen synchronously and every
//! subscriber is notified before the mutating call returns. Operations keyed
//! by id return an [`Outcome`] instead of failing when the id is unknown.

mod auth;
mod library;
mod observer;
mod project;

pub use auth::*;
pub use library::*;
pub use observer::*;
pub use project::*;

/// Result of a keyed mutation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    Applied,
    /// No record with that id; nothing changed.
    Absent,
}

impl Outcome {
    pub fn applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[cfg(test)]
mod tests;
