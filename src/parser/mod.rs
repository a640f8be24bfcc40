//! Lossless parser for Blueprint requirement documents
//!
//! This module provides an error-tolerant parser using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree with ERROR / MISSING markers
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//!     ↓
//! HIR → Symbols, dependency graph, diagnostics
//! ```

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
pub mod keywords;
mod lexer;
mod syntax_kind;

pub use ast::*;
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{BlueprintParser, DocumentParser, Parse, parse_blueprint};
pub use syntax_kind::{
    BlueprintLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodeChildren, SyntaxNodePtr,
    SyntaxToken,
};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
