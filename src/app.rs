//! Application module: the view model shared by the UI and the runtime.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
