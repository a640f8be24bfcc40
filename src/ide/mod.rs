//! IDE layer — document lifecycle and the workspace analysis host.
//!
//! Editor notifications enter through [`AnalysisHost`], which keeps the
//! [`DocumentManager`], the symbol index and the dependency graph in step and
//! returns the diagnostics to publish. No LSP types appear here; callers
//! convert at the protocol boundary.
//!
//! ## Usage
//!
//! ```ignore
//! use blueprint::ide::AnalysisHost;
//!
//! let mut host = AnalysisHost::new();
//! let publishes = host.open_document("file:///ws/a.bp", 1, "@module a\n");
//! ```

mod analysis;
mod document;

pub use analysis::AnalysisHost;
pub use document::{DocumentManager, DocumentState, PublishDiagnostics};
