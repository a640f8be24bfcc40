//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in a Blueprint syntax
//! tree. Besides the regular grammar nodes there are two recovery kinds:
//! `ERROR` wraps input the parser could not place, `MISSING` is a zero-width
//! node standing in for an expected token that never appeared.

/// All syntax kinds (tokens and nodes) in Blueprint
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation, prose).
/// Nodes are composite (modules, features, requirements, references).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // Line structure is significant: declarations and prose are line based
    NEWLINE,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,     // create-user
    NUMBER,    // 42, 2fa
    TEXT,      // any other prose run
    CODE_TEXT, // raw line inside a fenced code block

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    DOT,        // .
    COMMA,      // ,
    CODE_FENCE, // ```
    STAR_SLASH, // */ (only ever produced empty, inside MISSING)

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    DESCRIPTION_KW,
    MODULE_KW,
    FEATURE_KW,
    REQUIREMENT_KW,
    CONSTRAINT_KW,
    DEPENDS_ON_KW,
    UNKNOWN_KW, // @anything-else

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,
    DESCRIPTION_BLOCK,
    MODULE,
    FEATURE,
    REQUIREMENT,
    CONSTRAINT,
    DEPENDS_ON,
    REFERENCE,
    NAME,
    PROSE,
    CODE_BLOCK,
    COMMENT,

    // Special
    ERROR,
    MISSING,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::DESCRIPTION_KW as u16) && (self as u16) <= (Self::UNKNOWN_KW as u16)
    }

    /// Check if this is one of the declaration nodes that contribute a path segment
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            Self::MODULE | Self::FEATURE | Self::REQUIREMENT | Self::CONSTRAINT
        )
    }

    /// Block nesting rank of a keyword: a block runs until a keyword of equal
    /// or lower rank. `None` for keywords that do not open a block.
    pub fn block_rank(self) -> Option<u8> {
        match self {
            Self::DESCRIPTION_KW | Self::MODULE_KW => Some(0),
            Self::FEATURE_KW => Some(1),
            Self::REQUIREMENT_KW => Some(2),
            Self::CONSTRAINT_KW => Some(3),
            _ => None,
        }
    }

    /// Human readable name used in diagnostic messages
    pub fn display_name(self) -> &'static str {
        match self {
            Self::IDENT | Self::NAME => "identifier",
            Self::NUMBER => "number",
            Self::DOT => "'.'",
            Self::COMMA => "','",
            Self::CODE_FENCE => "closing ```",
            Self::STAR_SLASH => "closing */",
            Self::NEWLINE => "line break",
            Self::REFERENCE => "reference",
            Self::DESCRIPTION_KW | Self::DESCRIPTION_BLOCK => "description",
            Self::MODULE_KW | Self::MODULE => "module",
            Self::FEATURE_KW | Self::FEATURE => "feature",
            Self::REQUIREMENT_KW | Self::REQUIREMENT => "requirement",
            Self::CONSTRAINT_KW | Self::CONSTRAINT => "constraint",
            Self::DEPENDS_ON_KW | Self::DEPENDS_ON => "dependency declaration",
            Self::CODE_BLOCK => "code block",
            Self::COMMENT | Self::BLOCK_COMMENT => "block comment",
            _ => "token",
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlueprintLanguage {}

impl rowan::Language for BlueprintLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<BlueprintLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<BlueprintLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<BlueprintLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<BlueprintLanguage>;
pub type SyntaxNodePtr = rowan::ast::SyntaxNodePtr<BlueprintLanguage>;
