//! Project management: finding and loading workspace files.

mod error;
pub mod file_loader;
mod workspace_loader;

pub use error::LoadError;
pub use workspace_loader::{WorkspaceLoader, path_to_uri};
