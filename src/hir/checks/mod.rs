//! Diagnostic passes.
//!
//! Document passes see one parsed document: parse defects, description
//! placement and duplicate identifiers. Workspace passes need the symbol
//! index, the dependency graph and the ticket store.

mod duplicates;
mod parse_defects;
mod placement;
mod workspace;

use std::sync::Arc;

pub use duplicates::check_duplicates;
pub use parse_defects::{
    DefectContext, ERROR_RULES, ErrorRule, check_parse_defects, defect_span, error_message,
    missing_message,
};
pub use placement::check_placement;
pub use workspace::{check_ticket_source, check_workspace_document};

use super::diagnostics::{Diagnostic, DiagnosticCollector};
use super::options::AnalysisOptions;
use super::symbols::extract_symbols;
use crate::parser::Parse;

/// Run the three document passes and concatenate their results.
pub fn check_document(file: &str, parse: &Parse, options: &AnalysisOptions) -> Vec<Diagnostic> {
    let file: Arc<str> = Arc::from(file);
    let root = parse.syntax();
    let symbols = extract_symbols(&file, parse);

    let mut collector = DiagnosticCollector::new();
    collector.extend(check_parse_defects(&file, &root, parse.line_index(), options));
    collector.extend(check_placement(&file, &root, parse.line_index()));
    collector.extend(check_duplicates(&file, &symbols));
    tracing::trace!(
        file = %file,
        errors = collector.error_count(),
        warnings = collector.warning_count(),
        "checked document"
    );
    collector.finish()
}
