//! Per-document lifecycle state.
//!
//! `DocumentManager` owns one parsed tree per open document. Every trigger
//! re-parses the full text, recomputes the document diagnostics and replaces
//! the stored state wholesale; the previous tree is released first.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::hir::{AnalysisOptions, Diagnostic, check_document};
use crate::parser::{BlueprintParser, DocumentParser, Parse};

/// Diagnostics to publish for one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishDiagnostics {
    pub uri: Arc<str>,
    /// `None` once the document is closed
    pub version: Option<i32>,
    pub diagnostics: Vec<Diagnostic>,
}

/// State of one open document.
#[derive(Debug)]
pub struct DocumentState {
    pub uri: Arc<str>,
    pub version: i32,
    tree: Option<Parse>,
    /// Set when the tree has error or missing markers, or no tree could be built
    pub has_errors: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl DocumentState {
    /// The parsed tree, absent after total parse failure.
    pub fn tree(&self) -> Option<&Parse> {
        self.tree.as_ref()
    }

    fn release_tree(&mut self) {
        if self.tree.take().is_some() {
            tracing::trace!(uri = %self.uri, version = self.version, "released tree");
        }
    }
}

impl Drop for DocumentState {
    fn drop(&mut self) {
        self.release_tree();
    }
}

/// Owns the state of every open document, keyed by URI.
pub struct DocumentManager {
    parser: Arc<dyn DocumentParser>,
    options: AnalysisOptions,
    documents: IndexMap<Arc<str>, DocumentState>,
}

impl Default for DocumentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentManager {
    /// Create a manager using the bundled parser.
    pub fn new() -> Self {
        Self::with_parser(Arc::new(BlueprintParser))
    }

    pub fn with_parser(parser: Arc<dyn DocumentParser>) -> Self {
        Self {
            parser,
            options: AnalysisOptions::default(),
            documents: IndexMap::new(),
        }
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn parser(&self) -> &Arc<dyn DocumentParser> {
        &self.parser
    }

    pub fn open(&mut self, uri: &str, version: i32, text: &str) -> PublishDiagnostics {
        tracing::debug!(uri, version, "open document");
        self.replace(uri, version, text)
    }

    pub fn change(&mut self, uri: &str, version: i32, text: &str) -> PublishDiagnostics {
        tracing::debug!(uri, version, "change document");
        self.replace(uri, version, text)
    }

    /// Full re-validation, same as a change.
    pub fn save(&mut self, uri: &str, version: i32, text: &str) -> PublishDiagnostics {
        tracing::debug!(uri, version, "save document");
        self.replace(uri, version, text)
    }

    /// Release the document and publish an empty diagnostic list.
    pub fn close(&mut self, uri: &str) -> PublishDiagnostics {
        tracing::debug!(uri, "close document");
        if let Some(mut state) = self.documents.shift_remove(uri) {
            state.release_tree();
        }
        PublishDiagnostics {
            uri: Arc::from(uri),
            version: None,
            diagnostics: Vec::new(),
        }
    }

    fn replace(&mut self, uri: &str, version: i32, text: &str) -> PublishDiagnostics {
        if let Some(previous) = self.documents.get_mut(uri) {
            previous.release_tree();
        }

        let state = self.validate(uri, version, text);
        let publish = PublishDiagnostics {
            uri: state.uri.clone(),
            version: Some(version),
            diagnostics: state.diagnostics.clone(),
        };
        self.documents.insert(state.uri.clone(), state);
        publish
    }

    fn validate(&self, uri: &str, version: i32, text: &str) -> DocumentState {
        let uri: Arc<str> = Arc::from(uri);
        let Some(parse) = self.parser.parse(text) else {
            tracing::warn!(uri = %uri, version, "parser produced no tree");
            return DocumentState {
                uri,
                version,
                tree: None,
                has_errors: true,
                diagnostics: Vec::new(),
            };
        };

        let has_errors = parse.has_errors();
        let diagnostics = check_document(&uri, &parse, &self.options);
        tracing::debug!(
            uri = %uri,
            version,
            has_errors,
            diagnostics = diagnostics.len(),
            "validated document"
        );
        DocumentState {
            uri,
            version,
            tree: Some(parse),
            has_errors,
            diagnostics,
        }
    }

    pub fn get_state(&self, uri: &str) -> Option<&DocumentState> {
        self.documents.get(uri)
    }

    pub fn get_tree(&self, uri: &str) -> Option<&Parse> {
        self.documents.get(uri).and_then(|s| s.tree())
    }

    /// Document diagnostics; empty for unknown documents.
    pub fn diagnostics(&self, uri: &str) -> &[Diagnostic] {
        self.documents
            .get(uri)
            .map(|s| s.diagnostics.as_slice())
            .unwrap_or_default()
    }

    pub fn uris(&self) -> impl Iterator<Item = &Arc<str>> {
        self.documents.keys()
    }

    pub fn is_open(&self, uri: &str) -> bool {
        self.documents.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
