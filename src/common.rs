//! Shared types and helpers for the out-of-scope collaborator binaries
//! (`coordinator`, `volume`). Not used by the core engine in `src/store/`.

pub mod file_utils;
pub mod schemas;
