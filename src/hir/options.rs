//! Analysis options

use super::diagnostics::Severity;
use crate::base::constants::DEFAULT_SNIPPET_LEN;

/// Options controlling which diagnostics are produced and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Maximum number of characters of offending text quoted in a generic
    /// "unexpected" message
    pub max_snippet_len: usize,
    /// Report dependency targets that name no known symbol
    pub report_unresolved_references: bool,
    pub unresolved_reference_severity: Severity,
    /// Report requirements without a ticket. Only takes effect once at least
    /// one ticket source is registered.
    pub report_missing_tickets: bool,
    pub report_cycles: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_snippet_len: DEFAULT_SNIPPET_LEN,
            report_unresolved_references: true,
            unresolved_reference_severity: Severity::Warning,
            report_missing_tickets: true,
            report_cycles: true,
        }
    }
}

impl AnalysisOptions {
    /// Shorten `text` to at most `max_snippet_len` characters, marking the cut
    pub fn snippet(&self, text: &str) -> String {
        let text = text.trim();
        if text.chars().count() <= self.max_snippet_len {
            return text.to_string();
        }
        let mut short: String = text.chars().take(self.max_snippet_len).collect();
        short.push_str("...");
        short
    }
}
