//! Parser tests
//!
//! - Lexer coverage of the source text
//! - Lossless trees under recovery
//! - Typed AST access

pub mod tests_lexer;
pub mod tests_recovery;
