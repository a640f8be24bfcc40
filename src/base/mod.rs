//! Foundation types for the Blueprint toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`Position`], [`Span`] - Line/column positions for syntax nodes
//! - [`LineIndex`] - Byte offset to line/column conversion
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - Domain constants (file extension, message limits)
//!
//! This module has NO dependencies on other blueprint modules.

pub mod constants;
mod line_index;
mod position;

pub use line_index::LineIndex;
pub use position::{Position, Span};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};
