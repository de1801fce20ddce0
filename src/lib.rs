//! musicflow: music creation front-end with a terminal player.
//!
//! The crate is organised around one stateful core, the [`player`] engine,
//! surrounded by thin glue:
//!
//! * [`model`] holds the plain records (tracks, projects, playlists, users).
//! * [`store`] keeps observable in-memory collections of those records.
//! * [`generation`] and [`separation`] delegate audio work to external
//!   services; [`workflow`] wires their results into the stores.
//! * [`audio`] is the one media element that turns engine state into sound.
//! * [`runtime`] and [`ui`] provide the command line and terminal surface.

pub mod app;
pub mod audio;
pub mod auth;
pub mod config;
pub mod generation;
pub mod library;
pub mod logging;
pub mod model;
pub mod player;
pub mod runtime;
pub mod separation;
pub mod session;
pub mod storage;
pub mod store;
pub mod ui;
pub mod workflow;
