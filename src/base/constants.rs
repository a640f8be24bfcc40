//! Domain constants shared across the crate.

/// File extension of Blueprint documents (without the dot).
pub const BLUEPRINT_EXT: &str = "bp";

/// Default number of characters of offending text quoted in fallback parse messages.
pub const DEFAULT_SNIPPET_LEN: usize = 30;

/// Separator between identifiers in a qualified path.
pub const PATH_SEPARATOR: char = '.';
