//! Domain records shared by the stores, the player and the workflows.
//!
//! Records are plain data. Fields that may change after creation are only
//! touched through the typed patches defined next to each record, so ids and
//! creation timestamps stay fixed for the lifetime of a record.

mod playlist;
mod project;
mod track;
mod user;

pub use playlist::*;
pub use project::*;
pub use track::*;
pub use user::*;

/// Generate a fresh record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests;
