//! Duplicate identifiers within one document.

use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::base::TextRange;
use crate::hir::diagnostics::{Diagnostic, RelatedInfo, codes};
use crate::hir::symbols::Symbol;

/// Report every declaration whose identifier was already declared in the
/// same scope of this document.
///
/// Scopes follow containment, so the pair (enclosing path, name) is the
/// symbol's path. Members of a block that is itself a duplicate are only
/// compared with each other, not with the members of the first block.
/// `symbols` must be in document order, as extraction yields.
pub fn check_duplicates(file: &Arc<str>, symbols: &[Symbol]) -> Vec<Diagnostic> {
    let mut first_declared: FxHashMap<&str, &Symbol> = FxHashMap::default();
    let mut first_in_duplicate: FxHashMap<(TextRange, &str), &Symbol> = FxHashMap::default();
    let mut duplicate_blocks: Vec<TextRange> = Vec::new();
    let mut diagnostics = Vec::new();

    for symbol in symbols {
        let range = symbol.node.text_range();
        let path = symbol.path.as_ref();
        let first = match duplicate_blocks.iter().find(|b| b.contains_range(range)) {
            Some(&block) => first_or_insert(&mut first_in_duplicate, (block, path), symbol),
            None => first_or_insert(&mut first_declared, path, symbol),
        };
        let Some(first) = first else {
            continue;
        };
        duplicate_blocks.push(range);

        let first_line = first.name_span.start.line + 1;
        diagnostics.push(
            Diagnostic::error(
                file.clone(),
                symbol.name_span,
                format!(
                    "Duplicate {} '{}': already declared on line {first_line}",
                    symbol.kind.display(),
                    symbol.name
                ),
            )
            .with_code(codes::DUPLICATE_IDENTIFIER)
            .with_related(RelatedInfo {
                file: file.clone(),
                span: first.name_span,
                message: Arc::from(format!("'{}' first declared here", first.name)),
            }),
        );
    }
    diagnostics
}

fn first_or_insert<'s, K: Hash + Eq>(
    table: &mut FxHashMap<K, &'s Symbol>,
    key: K,
    symbol: &'s Symbol,
) -> Option<&'s Symbol> {
    match table.entry(key) {
        Entry::Occupied(e) => Some(*e.get()),
        Entry::Vacant(e) => {
            e.insert(symbol);
            None
        }
    }
}
