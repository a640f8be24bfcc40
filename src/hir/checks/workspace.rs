//! Diagnostics that need the whole workspace: unresolved references,
//! dependency cycles and ticket coverage.

use std::sync::Arc;

use crate::base::Span;
use crate::hir::diagnostics::{Diagnostic, RelatedInfo, Severity, codes};
use crate::hir::graph::DependencyGraphResult;
use crate::hir::index::SymbolIndex;
use crate::hir::options::AnalysisOptions;
use crate::hir::symbols::SymbolKind;
use crate::hir::tickets::TicketStore;

/// Workspace diagnostics attached to one document
pub fn check_workspace_document(
    file: &str,
    index: &SymbolIndex,
    graph: &DependencyGraphResult,
    tickets: &TicketStore,
    options: &AnalysisOptions,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let symbols = index.symbols_in_file(file);

    if options.report_unresolved_references {
        for symbol in &symbols {
            for reference in &symbol.dependencies {
                if index.resolve_reference(reference).is_resolved() {
                    continue;
                }
                diagnostics.push(
                    Diagnostic::new(
                        file,
                        reference.span,
                        options.unresolved_reference_severity,
                        format!("Unresolved reference '{}'", reference.path),
                    )
                    .with_code(codes::UNRESOLVED_REFERENCE),
                );
            }
        }
    }

    if options.report_cycles {
        for cycle in &graph.cycles {
            for edge in cycle.edges.iter().filter(|e| e.file.as_ref() == file) {
                diagnostics.push(
                    Diagnostic::error(
                        file,
                        edge.reference.span,
                        format!("Circular dependency: {}", cycle.display()),
                    )
                    .with_code(codes::CIRCULAR_DEPENDENCY),
                );
            }
        }
    }

    if options.report_missing_tickets && tickets.has_sources() {
        for symbol in symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Requirement)
        {
            if tickets.tickets_for(&symbol.path).is_empty() {
                diagnostics.push(
                    Diagnostic::info(
                        file,
                        symbol.name_span,
                        format!("Requirement '{}' has no ticket", symbol.path),
                    )
                    .with_code(codes::NO_TICKET),
                );
            }
        }
    }

    diagnostics.sort_by_key(|d| d.span);
    diagnostics
}

/// Tickets of one source whose reference names no known requirement
pub fn check_ticket_source(source: &str, index: &SymbolIndex, tickets: &TicketStore) -> Vec<Diagnostic> {
    let source: Arc<str> = Arc::from(source);
    tickets
        .tickets_in_source(&source)
        .iter()
        .filter(|ticket| {
            !index
                .get_symbol(&ticket.reference)
                .is_some_and(|symbols| symbols.iter().any(|s| s.kind == SymbolKind::Requirement))
        })
        .map(|ticket| {
            let mut diagnostic = Diagnostic::new(
                source.clone(),
                Span::default(),
                Severity::Warning,
                format!(
                    "Ticket '{}' references unknown requirement '{}'",
                    ticket.id, ticket.reference
                ),
            )
            .with_code(codes::ORPHANED_TICKET);
            // Point at a declaration of the same path if it exists with another kind
            if let Some(other) = index.get_symbol(&ticket.reference).and_then(|s| s.first()) {
                diagnostic = diagnostic.with_related(RelatedInfo {
                    file: other.file.clone(),
                    span: other.name_span,
                    message: Arc::from(format!(
                        "'{}' is a {}, not a requirement",
                        other.path,
                        other.kind.display()
                    )),
                });
            }
            diagnostic
        })
        .collect()
}
