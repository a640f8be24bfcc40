//! Workspace-wide symbol index keyed by qualified path.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;

use super::symbols::{Reference, Symbol, SymbolKind, extract_symbols};
use crate::parser::Parse;

/// Result of resolving a dependency reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedReference<'a> {
    pub symbol: Option<&'a Symbol>,
}

impl ResolvedReference<'_> {
    pub fn is_resolved(&self) -> bool {
        self.symbol.is_some()
    }
}

/// An index of all symbols across multiple files.
///
/// Several symbols may share a path, either because a document declares
/// the same identifier twice or because two files declare the same path.
/// The index keeps all of them; reporting duplicates is up to the caller.
#[derive(Clone, Debug, Default)]
pub struct SymbolIndex {
    /// Path -> declaration sites, in the order files were added.
    by_path: IndexMap<Arc<str>, Vec<Symbol>>,
    /// File -> paths it contributes to.
    by_file: FxHashMap<Arc<str>, IndexSet<Arc<str>>>,
}

impl SymbolIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract and add the symbols of a parsed document, replacing any
    /// previous content for `file`.
    pub fn add_file(&mut self, file: &str, parse: &Parse) {
        let symbols = extract_symbols(file, parse);
        self.add_symbols(file, symbols);
    }

    /// Add already extracted symbols for a file, replacing its previous content.
    pub fn add_symbols(&mut self, file: &str, symbols: Vec<Symbol>) {
        // Remove existing symbols from this file first
        self.remove_file(file);

        let file: Arc<str> = Arc::from(file);
        let mut paths = IndexSet::with_capacity(symbols.len());
        for symbol in symbols {
            paths.insert(symbol.path.clone());
            self.by_path
                .entry(symbol.path.clone())
                .or_default()
                .push(symbol);
        }

        tracing::trace!(file = %file, paths = paths.len(), "indexed file");
        self.by_file.insert(file, paths);
    }

    /// Remove all symbols from a file.
    pub fn remove_file(&mut self, file: &str) {
        let Some(paths) = self.by_file.remove(file) else {
            return;
        };
        for path in paths {
            if let Some(symbols) = self.by_path.get_mut(&path) {
                symbols.retain(|s| s.file.as_ref() != file);
                if symbols.is_empty() {
                    self.by_path.shift_remove(&path);
                }
            }
        }
    }

    /// Look up every declaration of an exact path.
    pub fn get_symbol(&self, path: &str) -> Option<&[Symbol]> {
        self.by_path.get(path).map(|v| v.as_slice())
    }

    /// Get all symbols of one kind.
    pub fn get_symbols_by_kind(&self, kind: SymbolKind) -> Vec<&Symbol> {
        self.all_symbols().filter(|s| s.kind == kind).collect()
    }

    /// Resolve a reference by exact path. The first declaration wins.
    pub fn resolve_reference(&self, reference: &Reference) -> ResolvedReference<'_> {
        self.resolve_path(&reference.path)
    }

    pub fn resolve_path(&self, path: &str) -> ResolvedReference<'_> {
        ResolvedReference {
            symbol: self.by_path.get(path).and_then(|symbols| symbols.first()),
        }
    }

    /// Get all symbols in a file.
    pub fn symbols_in_file(&self, file: &str) -> Vec<&Symbol> {
        self.by_file
            .get(file)
            .map(|paths| {
                paths
                    .iter()
                    .filter_map(|path| self.by_path.get(path))
                    .flatten()
                    .filter(|s| s.file.as_ref() == file)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get all symbols in the index.
    pub fn all_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.by_path.values().flatten()
    }

    /// All distinct paths.
    pub fn paths(&self) -> impl Iterator<Item = &Arc<str>> {
        self.by_path.keys()
    }

    pub fn files(&self) -> impl Iterator<Item = &Arc<str>> {
        self.by_file.keys()
    }

    pub fn contains_file(&self, file: &str) -> bool {
        self.by_file.contains_key(file)
    }

    /// Get the number of distinct paths.
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Get number of files indexed.
    pub fn file_count(&self) -> usize {
        self.by_file.len()
    }
}
