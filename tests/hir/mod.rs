//! HIR layer tests
//!
//! - Symbol index contents and cross-file resolution
//! - Dependency graph edges, cycles and ordering
//! - Document and workspace diagnostics

pub mod tests_diagnostics;
pub mod tests_index;
