//! AnalysisHost — unified state for a Blueprint workspace.
//!
//! The host owns the open documents, the text of workspace files that are
//! not open, the cross-file symbol index, the ticket store and the
//! dependency graph. The graph is rebuilt lazily: any change marks it dirty
//! and the next query rebuilds it in full.
//!
//! ## Usage
//!
//! ```ignore
//! let mut host = AnalysisHost::new();
//!
//! // Files found on disk
//! host.set_file_content("file:///ws/storage.bp", text);
//!
//! // Editor notifications
//! for publish in host.open_document("file:///ws/auth.bp", 1, text) {
//!     client.publish(publish);
//! }
//!
//! let graph = host.dependency_graph();
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use super::document::{DocumentManager, DocumentState, PublishDiagnostics};
use crate::hir::checks::{check_ticket_source, check_workspace_document};
use crate::hir::{
    AnalysisOptions, DependencyGraph, DependencyGraphResult, Diagnostic, DiagnosticCollector,
    RequirementStatus, SymbolIndex, Ticket, TicketStore, requirement_status,
};
use crate::parser::DocumentParser;

/// Owns all mutable state of the semantic layer.
pub struct AnalysisHost {
    documents: DocumentManager,
    /// Text of workspace files as last read from disk
    workspace_files: IndexMap<Arc<str>, Arc<str>>,
    symbol_index: SymbolIndex,
    tickets: TicketStore,
    graph: DependencyGraphResult,
    /// Whether the graph needs rebuilding
    graph_dirty: bool,
    /// Diagnostics last published per open document
    published: FxHashMap<Arc<str>, Vec<Diagnostic>>,
}

impl Default for AnalysisHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisHost {
    /// Create a new empty AnalysisHost.
    pub fn new() -> Self {
        Self::with_documents(DocumentManager::new())
    }

    pub fn with_options(options: AnalysisOptions) -> Self {
        Self::with_documents(DocumentManager::new().with_options(options))
    }

    pub fn with_parser(parser: Arc<dyn DocumentParser>, options: AnalysisOptions) -> Self {
        Self::with_documents(DocumentManager::with_parser(parser).with_options(options))
    }

    fn with_documents(documents: DocumentManager) -> Self {
        Self {
            documents,
            workspace_files: IndexMap::new(),
            symbol_index: SymbolIndex::new(),
            tickets: TicketStore::new(),
            graph: DependencyGraphResult::default(),
            graph_dirty: true,
            published: FxHashMap::default(),
        }
    }

    // =========================================================================
    // Editor triggers
    // =========================================================================

    pub fn open_document(&mut self, uri: &str, version: i32, text: &str) -> Vec<PublishDiagnostics> {
        self.documents.open(uri, version, text);
        self.reindex_open_document(uri);
        self.publish_changes(Some(uri))
    }

    pub fn change_document(&mut self, uri: &str, version: i32, text: &str) -> Vec<PublishDiagnostics> {
        self.documents.change(uri, version, text);
        self.reindex_open_document(uri);
        self.publish_changes(Some(uri))
    }

    pub fn save_document(&mut self, uri: &str, version: i32, text: &str) -> Vec<PublishDiagnostics> {
        self.documents.save(uri, version, text);
        self.reindex_open_document(uri);
        self.publish_changes(Some(uri))
    }

    /// Close a document. Its symbols fall back to the workspace copy of the
    /// file when there is one.
    pub fn close_document(&mut self, uri: &str) -> Vec<PublishDiagnostics> {
        let cleared = self.documents.close(uri);
        self.published.remove(uri);
        match self.workspace_files.get(uri).cloned() {
            Some(text) => self.index_text(uri, &text),
            None => self.symbol_index.remove_file(uri),
        }
        self.graph_dirty = true;

        let mut publishes = vec![cleared];
        publishes.extend(self.publish_changes(None));
        publishes
    }

    // =========================================================================
    // Workspace files and tickets
    // =========================================================================

    /// Set the on-disk content of a workspace file.
    ///
    /// Open documents keep their editor text; the workspace copy is only
    /// indexed while the document is closed.
    pub fn set_file_content(&mut self, uri: &str, text: &str) -> Vec<PublishDiagnostics> {
        self.workspace_files.insert(Arc::from(uri), Arc::from(text));
        if !self.documents.is_open(uri) {
            self.index_text(uri, text);
            self.graph_dirty = true;
        }
        self.publish_changes(None)
    }

    /// Forget a workspace file (deleted on disk).
    pub fn remove_file(&mut self, uri: &str) -> Vec<PublishDiagnostics> {
        self.workspace_files.shift_remove(uri);
        if !self.documents.is_open(uri) {
            self.symbol_index.remove_file(uri);
            self.graph_dirty = true;
        }
        self.publish_changes(None)
    }

    /// Replace the tickets loaded from one ticket source.
    pub fn set_tickets(&mut self, source: &str, tickets: Vec<Ticket>) -> Vec<PublishDiagnostics> {
        tracing::debug!(source, tickets = tickets.len(), "set tickets");
        self.tickets.set_tickets(source, tickets);
        self.publish_changes(None)
    }

    pub fn remove_tickets(&mut self, source: &str) -> Vec<PublishDiagnostics> {
        self.tickets.remove_tickets(source);
        self.publish_changes(None)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn symbol_index(&self) -> &SymbolIndex {
        &self.symbol_index
    }

    pub fn tickets(&self) -> &TicketStore {
        &self.tickets
    }

    pub fn documents(&self) -> &DocumentManager {
        &self.documents
    }

    pub fn document(&self, uri: &str) -> Option<&DocumentState> {
        self.documents.get_state(uri)
    }

    pub fn has_workspace_file(&self, uri: &str) -> bool {
        self.workspace_files.contains_key(uri)
    }

    pub fn workspace_file_count(&self) -> usize {
        self.workspace_files.len()
    }

    /// The dependency graph, rebuilt first if anything changed.
    pub fn dependency_graph(&mut self) -> &DependencyGraphResult {
        self.ensure_graph();
        &self.graph
    }

    /// Document diagnostics (if open) followed by workspace diagnostics.
    pub fn diagnostics(&mut self, uri: &str) -> Vec<Diagnostic> {
        self.ensure_graph();
        self.compute_diagnostics(uri)
    }

    /// Diagnostics for the tickets of one source.
    pub fn ticket_diagnostics(&self, source: &str) -> Vec<Diagnostic> {
        check_ticket_source(source, &self.symbol_index, &self.tickets)
    }

    pub fn requirement_status(&self, path: &str) -> Option<RequirementStatus> {
        requirement_status(&self.symbol_index, &self.tickets, path)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn reindex_open_document(&mut self, uri: &str) {
        match self.documents.get_tree(uri) {
            Some(tree) => self.symbol_index.add_file(uri, tree),
            None => self.symbol_index.remove_file(uri),
        }
        self.graph_dirty = true;
    }

    fn index_text(&mut self, uri: &str, text: &str) {
        match self.documents.parser().parse(text) {
            Some(parse) => self.symbol_index.add_file(uri, &parse),
            None => {
                tracing::warn!(uri, "workspace file could not be parsed");
                self.symbol_index.remove_file(uri);
            }
        }
    }

    fn ensure_graph(&mut self) {
        if self.graph_dirty {
            self.graph = DependencyGraph::build(&self.symbol_index);
            self.graph_dirty = false;
        }
    }

    fn compute_diagnostics(&self, uri: &str) -> Vec<Diagnostic> {
        let mut collector = DiagnosticCollector::new();
        collector.extend(self.documents.diagnostics(uri).iter().cloned());
        collector.extend(check_workspace_document(
            uri,
            &self.symbol_index,
            &self.graph,
            &self.tickets,
            self.documents.options(),
        ));
        collector.finish()
    }

    /// Publish the target document unconditionally, then every other open
    /// document whose diagnostics differ from what was last published.
    fn publish_changes(&mut self, target: Option<&str>) -> Vec<PublishDiagnostics> {
        self.ensure_graph();

        let mut uris: Vec<Arc<str>> = Vec::new();
        if let Some(target) = target.and_then(|t| self.documents.uris().find(|u| u.as_ref() == t)) {
            uris.push(target.clone());
        }
        uris.extend(
            self.documents
                .uris()
                .filter(|u| Some(u.as_ref()) != target)
                .cloned(),
        );

        let mut publishes = Vec::new();
        for uri in uris {
            let diagnostics = self.compute_diagnostics(&uri);
            let is_target = Some(uri.as_ref()) == target;
            if !is_target && self.published.get(&uri) == Some(&diagnostics) {
                continue;
            }
            let version = self.documents.get_state(&uri).map(|s| s.version);
            self.published.insert(uri.clone(), diagnostics.clone());
            publishes.push(PublishDiagnostics {
                uri,
                version,
                diagnostics,
            });
        }
        publishes
    }
}
