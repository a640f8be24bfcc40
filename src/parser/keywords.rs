//! Keyword spellings of the Blueprint notation.

use super::SyntaxKind;

pub const DESCRIPTION: &str = "@description";
pub const MODULE: &str = "@module";
pub const FEATURE: &str = "@feature";
pub const REQUIREMENT: &str = "@requirement";
pub const CONSTRAINT: &str = "@constraint";
pub const DEPENDS_ON: &str = "@depends-on";

/// All keywords, in the order they are listed in messages.
pub const ALL: &[&str] = &[DESCRIPTION, MODULE, FEATURE, REQUIREMENT, CONSTRAINT, DEPENDS_ON];

/// Keyword spelling for a keyword token or the node it introduces.
pub fn spelling(kind: SyntaxKind) -> Option<&'static str> {
    match kind {
        SyntaxKind::DESCRIPTION_KW | SyntaxKind::DESCRIPTION_BLOCK => Some(DESCRIPTION),
        SyntaxKind::MODULE_KW | SyntaxKind::MODULE => Some(MODULE),
        SyntaxKind::FEATURE_KW | SyntaxKind::FEATURE => Some(FEATURE),
        SyntaxKind::REQUIREMENT_KW | SyntaxKind::REQUIREMENT => Some(REQUIREMENT),
        SyntaxKind::CONSTRAINT_KW | SyntaxKind::CONSTRAINT => Some(CONSTRAINT),
        SyntaxKind::DEPENDS_ON_KW | SyntaxKind::DEPENDS_ON => Some(DEPENDS_ON),
        _ => None,
    }
}
