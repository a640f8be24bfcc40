//! Project loading tests

pub mod tests_workspace_loader;
