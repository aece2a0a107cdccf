//! Request handlers.
//!
//! Each submodule provides async handler functions for one API surface.
//! Handlers delegate to the repositories in `dexvault_db` and map errors
//! via [`crate::error::AppError`]. Every collection read and write is
//! filtered by the authenticated principal's userId; a client-supplied
//! userId is never trusted.

pub mod admin;
pub mod audit;
pub mod catalog;
pub mod collection;
pub mod media;
pub mod search;
pub mod sharing;
