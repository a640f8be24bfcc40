//! # blueprint-base
//!
//! Semantic core of the Blueprint requirements language server: parsing,
//! the cross-file symbol index, the dependency graph and diagnostics.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → Document lifecycle, AnalysisHost, publishing
//!   ↓
//! project   → Workspace loading from disk
//!   ↓
//! hir       → Symbols, index, dependency graph, tickets, diagnostic passes
//!   ↓
//! parser    → Logos lexer, recovering parser, typed AST over rowan
//!   ↓
//! base      → Primitives (Span, Position, LineIndex)
//! ```

/// Foundation types: Span, Position, LineIndex
pub mod base;

/// Parser: Logos lexer, error-recovering parser, typed AST
pub mod parser;

/// High-level IR: symbols, index, dependency graph, diagnostics
pub mod hir;

/// IDE layer: documents and the analysis host
pub mod ide;

/// Project management: workspace loading
pub mod project;

// Re-export commonly needed items
pub use parser::keywords;

pub use base::{LineIndex, Position, Span, TextRange, TextSize};
pub use hir::{
    AnalysisOptions, DependencyGraph, DependencyGraphResult, Diagnostic, Severity, Symbol,
    SymbolIndex, SymbolKind,
};
pub use ide::{AnalysisHost, DocumentManager, PublishDiagnostics};
pub use parser::{BlueprintParser, DocumentParser, Parse, parse_blueprint};
