//! High-level IR (HIR) — the semantic model of a Blueprint workspace.
//!
//! ## Key Types
//!
//! - [`Symbol`] — One declaration site of a qualified path
//! - [`SymbolIndex`] — Workspace-wide symbol table keyed by path
//! - [`DependencyGraph`] — Edge extraction, cycles and topological order
//! - [`Diagnostic`] — Diagnostics produced by the [`checks`] passes
//! - [`TicketStore`] — Ticket records and per-requirement summaries
//!
//! ## Layers
//!
//! ```text
//! Parse (per document)
//!     │
//!     ▼
//! extract_symbols(file)     ← Symbols with dependency references
//!     │
//!     ▼
//! SymbolIndex               ← Workspace-wide, replaced per file
//!     │
//!     ▼
//! DependencyGraph::build    ← Full rebuild on demand
//!     │
//!     ▼
//! checks                    ← Document and workspace diagnostics
//! ```

pub mod checks;
mod diagnostics;
mod graph;
mod index;
mod options;
mod symbols;
mod tickets;

pub use checks::check_document;
pub use diagnostics::{Diagnostic, DiagnosticCollector, RelatedInfo, Severity, codes};
pub use graph::{CircularDependency, DependencyEdge, DependencyGraph, DependencyGraphResult};
pub use index::{ResolvedReference, SymbolIndex};
pub use options::AnalysisOptions;
pub use symbols::{Reference, Symbol, SymbolKind, extract_symbols, join_path};
pub use tickets::{
    ConstraintStatus, RequirementStatus, Ticket, TicketStatus, TicketStore, requirement_status,
};
