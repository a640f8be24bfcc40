//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode and provides methods to access children.
//! Recovery markers (`ERROR`, `MISSING`) stay visible through the node
//! helpers at the bottom of this module.

use smol_str::SmolStr;

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

fn child_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens().filter_map(|e| e.into_token())
}

// ============================================================================
// Root
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// Top-level declarations, including those the parser placed inside
    /// error regions
    pub fn declarations(&self) -> impl Iterator<Item = Declaration> + '_ {
        self.0.children().flat_map(|child| {
            if child.kind() == SyntaxKind::ERROR {
                child.children().filter_map(Declaration::cast).collect::<Vec<_>>()
            } else {
                Declaration::cast(child).into_iter().collect()
            }
        })
    }

    pub fn descriptions(&self) -> impl Iterator<Item = DescriptionBlock> + '_ {
        self.0.children().filter_map(DescriptionBlock::cast)
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// A named block: module, feature, requirement or constraint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration(SyntaxNode);

impl AstNode for Declaration {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_declaration()
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self(node))
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

impl Declaration {
    pub fn kind(&self) -> SyntaxKind {
        self.0.kind()
    }

    pub fn keyword(&self) -> Option<SyntaxToken> {
        child_tokens(&self.0).find(|t| t.kind().is_keyword())
    }

    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    /// Nested declarations, looking through error wrappers
    pub fn children(&self) -> impl Iterator<Item = Declaration> + '_ {
        self.0.children().flat_map(|child| {
            if child.kind() == SyntaxKind::ERROR {
                child.children().filter_map(Declaration::cast).collect::<Vec<_>>()
            } else {
                Declaration::cast(child).into_iter().collect()
            }
        })
    }

    /// `@depends-on` statements directly in this block's body
    pub fn depends_on(&self) -> impl Iterator<Item = DependsOn> + '_ {
        self.0.children().filter_map(DependsOn::cast)
    }

    pub fn code_blocks(&self) -> impl Iterator<Item = CodeBlock> + '_ {
        self.0.children().filter_map(CodeBlock::cast)
    }
}

ast_node!(DescriptionBlock, DESCRIPTION_BLOCK);

impl DescriptionBlock {
    /// The prose of the block with line structure preserved
    pub fn text(&self) -> String {
        self.0
            .children()
            .filter(|c| c.kind() == SyntaxKind::PROSE)
            .map(|c| c.text().to_string().trim().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ============================================================================
// Names and references
// ============================================================================

ast_node!(Name, NAME);

impl Name {
    pub fn ident(&self) -> Option<SyntaxToken> {
        child_tokens(&self.0).find(|t| t.kind() == SyntaxKind::IDENT)
    }

    pub fn text(&self) -> Option<SmolStr> {
        self.ident().map(|t| SmolStr::new(t.text()))
    }
}

ast_node!(DependsOn, DEPENDS_ON);

impl DependsOn {
    pub fn references(&self) -> impl Iterator<Item = Reference> + '_ {
        self.0.children().filter_map(Reference::cast)
    }
}

ast_node!(Reference, REFERENCE);

impl Reference {
    /// Identifier segments in order, ignoring malformed separators
    pub fn parts(&self) -> Vec<SmolStr> {
        child_tokens(&self.0)
            .filter(|t| t.kind() == SyntaxKind::IDENT)
            .map(|t| SmolStr::new(t.text()))
            .collect()
    }

    /// The dotted path this reference names
    pub fn path(&self) -> String {
        self.parts().join(".")
    }

    /// Leading, trailing or doubled dots were wrapped in error nodes
    pub fn is_malformed(&self) -> bool {
        self.0.children().any(|c| c.kind() == SyntaxKind::ERROR)
    }
}

ast_node!(CodeBlock, CODE_BLOCK);

impl CodeBlock {
    pub fn is_closed(&self) -> bool {
        !self.0.children().any(|c| c.kind() == SyntaxKind::MISSING)
    }

    /// Info string after the opening fence, if any
    pub fn info(&self) -> Option<String> {
        let info: String = child_tokens(&self.0)
            .skip(1)
            .take_while(|t| t.kind() != SyntaxKind::NEWLINE)
            .map(|t| t.text().to_string())
            .collect();
        let info = info.trim();
        (!info.is_empty()).then(|| info.to_string())
    }
}

// ============================================================================
// Recovery markers
// ============================================================================

pub fn is_error(node: &SyntaxNode) -> bool {
    node.kind() == SyntaxKind::ERROR
}

pub fn is_missing(node: &SyntaxNode) -> bool {
    node.kind() == SyntaxKind::MISSING
}

/// The token kind a `MISSING` node stands in for
pub fn missing_kind(node: &SyntaxNode) -> Option<SyntaxKind> {
    if !is_missing(node) {
        return None;
    }
    child_tokens(node).next().map(|t| t.kind())
}

/// Whether `node` or anything below it is an error or missing marker
pub fn contains_error(node: &SyntaxNode) -> bool {
    if is_error(node) || is_missing(node) {
        return true;
    }
    node.children().any(|child| contains_error(&child))
}
