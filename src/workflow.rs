//! User-level actions that span several modules.
//!
//! Generating music records a project and adds the results to the library.
//! Separating a file uploads it, records a `processing` project and moves it
//! to `completed` or `failed` as job updates arrive.

mod generate;
mod separate;

pub use generate::*;
pub use separate::*;

use thiserror::Error;

use crate::auth::AuthError;
use crate::generation::GenerationError;
use crate::separation::SeparationError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Separation(#[from] SeparationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[cfg(test)]
mod tests;
