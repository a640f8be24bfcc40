//! Description block placement.
//!
//! A document has at most one `@description`, and it comes before the first
//! `@module`. Elements the parser swallowed into a top-level error region
//! count at their textual position.

use std::sync::Arc;

use crate::base::{LineIndex, TextRange};
use crate::hir::diagnostics::{Diagnostic, RelatedInfo, codes};
use crate::parser::{SyntaxKind, SyntaxNode, is_error, keywords};

/// Top-level children, with error wrappers replaced by their direct children
fn top_level_elements(root: &SyntaxNode) -> Vec<SyntaxNode> {
    root.children()
        .flat_map(|child| {
            if is_error(&child) {
                child.children().collect::<Vec<_>>()
            } else {
                vec![child]
            }
        })
        .collect()
}

/// Range of the `@description` keyword of a block
fn keyword_range(block: &SyntaxNode) -> TextRange {
    block
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == SyntaxKind::DESCRIPTION_KW)
        .map(|t| t.text_range())
        .unwrap_or_else(|| block.text_range())
}

pub fn check_placement(file: &Arc<str>, root: &SyntaxNode, line_index: &LineIndex) -> Vec<Diagnostic> {
    let elements = top_level_elements(root);
    let first_module = elements
        .iter()
        .find(|e| e.kind() == SyntaxKind::MODULE)
        .map(|m| m.text_range().start());

    let mut diagnostics = Vec::new();
    let mut first_description: Option<TextRange> = None;
    for block in elements
        .iter()
        .filter(|e| e.kind() == SyntaxKind::DESCRIPTION_BLOCK)
    {
        let range = keyword_range(block);
        let span = line_index.span(range);
        match first_description {
            None => {
                first_description = Some(range);
                if first_module.is_some_and(|module| module < range.start()) {
                    diagnostics.push(
                        Diagnostic::warning(
                            file.clone(),
                            span,
                            format!(
                                "{} must come before the first {}",
                                keywords::DESCRIPTION,
                                keywords::MODULE
                            ),
                        )
                        .with_code(codes::MISPLACED_DESCRIPTION),
                    );
                }
            }
            Some(first) => {
                diagnostics.push(
                    Diagnostic::warning(
                        file.clone(),
                        span,
                        format!(
                            "Only one {} block is allowed per document",
                            keywords::DESCRIPTION
                        ),
                    )
                    .with_code(codes::DUPLICATE_DESCRIPTION)
                    .with_related(RelatedInfo {
                        file: file.clone(),
                        span: line_index.span(first),
                        message: Arc::from("first description block"),
                    }),
                );
            }
        }
    }
    diagnostics
}
