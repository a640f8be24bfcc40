//! Symbol extraction from AST — pure functions that return symbols.
//!
//! Walks the containment hierarchy of one parsed document and returns a
//! `Symbol` for every named module, feature, requirement and constraint.
//! Dependency declarations are captured on their owning symbol so the
//! dependency graph can be rebuilt from the index alone.

use std::sync::Arc;

use crate::base::{LineIndex, Span, constants::PATH_SEPARATOR};
use crate::parser::{self, AstNode, Declaration, Parse, SourceFile, SyntaxKind, SyntaxNode, SyntaxNodePtr};

/// The kind of a declared symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Module,
    Feature,
    Requirement,
    Constraint,
}

impl SymbolKind {
    /// Map a declaration node kind to a symbol kind.
    pub fn from_syntax_kind(kind: SyntaxKind) -> Option<Self> {
        match kind {
            SyntaxKind::MODULE => Some(Self::Module),
            SyntaxKind::FEATURE => Some(Self::Feature),
            SyntaxKind::REQUIREMENT => Some(Self::Requirement),
            SyntaxKind::CONSTRAINT => Some(Self::Constraint),
            _ => None,
        }
    }

    /// Get a display name for this kind.
    pub fn display(&self) -> &'static str {
        match self {
            SymbolKind::Module => "module",
            SymbolKind::Feature => "feature",
            SymbolKind::Requirement => "requirement",
            SymbolKind::Constraint => "constraint",
        }
    }

    /// The keyword that declares this kind, e.g. `@module`.
    pub fn keyword(&self) -> &'static str {
        match self {
            SymbolKind::Module => parser::keywords::MODULE,
            SymbolKind::Feature => parser::keywords::FEATURE,
            SymbolKind::Requirement => parser::keywords::REQUIREMENT,
            SymbolKind::Constraint => parser::keywords::CONSTRAINT,
        }
    }
}

/// A dependency target named in a `@depends-on` statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reference {
    /// Identifier segments as written
    pub raw_parts: Vec<Arc<str>>,
    /// Segments joined by `.`
    pub path: Arc<str>,
    pub span: Span,
    pub file: Arc<str>,
}

impl Reference {
    pub fn new(parts: Vec<Arc<str>>, span: Span, file: impl Into<Arc<str>>) -> Self {
        let path = join_path(parts.iter().map(|p| p.as_ref()));
        Self {
            raw_parts: parts,
            path: path.into(),
            span,
            file: file.into(),
        }
    }
}

/// One declaration site of a qualified path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    /// The simple name of the symbol
    pub name: Arc<str>,
    /// The fully qualified dotted path
    pub path: Arc<str>,
    pub kind: SymbolKind,
    /// Range of the whole declaration block
    pub span: Span,
    /// Range of the identifier after the keyword
    pub name_span: Span,
    /// The document containing this symbol
    pub file: Arc<str>,
    /// Pointer to the declaration node in the owning document's tree
    pub node: SyntaxNodePtr,
    /// Targets of `@depends-on` statements directly in this block
    pub dependencies: Vec<Reference>,
}

impl Symbol {
    /// Path of the enclosing declaration, if any.
    pub fn parent_path(&self) -> Option<&str> {
        self.path
            .rsplit_once(PATH_SEPARATOR)
            .map(|(parent, _)| parent)
    }

    /// Find this symbol's declaration node in the tree it was extracted from.
    ///
    /// Returns `None` when `root` is a different revision of the document
    /// that no longer has a node of the same kind at the same range.
    pub fn resolve_node(&self, root: &SyntaxNode) -> Option<SyntaxNode> {
        let range = self.node.text_range();
        let kind = self.node.kind();
        root.descendants()
            .find(|node| node.kind() == kind && node.text_range() == range)
    }
}

/// Join identifier segments into a dotted path.
pub fn join_path<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut path = String::new();
    for part in parts {
        if !path.is_empty() {
            path.push(PATH_SEPARATOR);
        }
        path.push_str(part);
    }
    path
}

/// Extract all symbols from a parsed document.
///
/// Declarations the parser wrapped in error regions are still extracted;
/// a declaration without a name is skipped together with everything it
/// contains, since no path can be derived for it.
pub fn extract_symbols(file: &str, parse: &Parse) -> Vec<Symbol> {
    let Some(source) = SourceFile::cast(parse.syntax()) else {
        return Vec::new();
    };
    let file: Arc<str> = Arc::from(file);
    let mut extractor = Extractor {
        file,
        line_index: parse.line_index(),
        symbols: Vec::new(),
    };
    for declaration in source.declarations() {
        extractor.visit(&declaration, None);
    }
    extractor.symbols
}

struct Extractor<'a> {
    file: Arc<str>,
    line_index: &'a LineIndex,
    symbols: Vec<Symbol>,
}

impl Extractor<'_> {
    fn visit(&mut self, declaration: &Declaration, parent: Option<&str>) {
        let Some(kind) = SymbolKind::from_syntax_kind(declaration.kind()) else {
            return;
        };
        let Some(name_node) = declaration.name() else {
            return;
        };
        let Some(name) = name_node.text() else {
            return;
        };

        let path: Arc<str> = match parent {
            Some(parent) => format!("{parent}{PATH_SEPARATOR}{name}").into(),
            None => name.as_str().into(),
        };
        let syntax = declaration.syntax();

        let dependencies = declaration
            .depends_on()
            .flat_map(|statement| statement.references().collect::<Vec<_>>())
            .filter_map(|reference| {
                // Already a parse defect; its segments name some other path
                if reference.is_malformed() {
                    return None;
                }
                let parts: Vec<Arc<str>> =
                    reference.parts().iter().map(|p| Arc::from(p.as_str())).collect();
                if parts.is_empty() {
                    return None;
                }
                let span = self.line_index.span(reference.syntax().text_range());
                Some(Reference::new(parts, span, self.file.clone()))
            })
            .collect();

        tracing::trace!(path = %path, kind = kind.display(), "extracted symbol");
        self.symbols.push(Symbol {
            name: Arc::from(name.as_str()),
            path: path.clone(),
            kind,
            span: self.line_index.span(syntax.text_range()),
            name_span: self.line_index.span(name_node.syntax().text_range()),
            file: self.file.clone(),
            node: SyntaxNodePtr::new(syntax),
            dependencies,
        });

        for child in declaration.children() {
            self.visit(&child, Some(&path));
        }
    }
}
