//! DexVault domain logic.
//!
//! This crate has zero internal dependencies so its contents (region
//! catalog, merge protocol, search scoring, share tokens, blob naming)
//! can be used by the repository layer, the API server, and any future
//! CLI tooling alike. Everything here is pure: no I/O, no clocks other
//! than explicitly passed timestamps.

pub mod catalog;
pub mod error;
pub mod media;
pub mod merge;
pub mod principal;
pub mod regions;
pub mod roles;
pub mod search;
pub mod share;
pub mod types;
