//! Shared test helpers.

pub mod workspace_helpers;
