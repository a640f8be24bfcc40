//! Diagnostics — error reporting for documents and the workspace.
//!
//! This module provides the diagnostic type shared by every analysis pass,
//! the stable string codes consumers match on, and a collector.

use std::sync::Arc;

use crate::base::Span;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The document containing this diagnostic.
    pub file: Arc<str>,
    /// Source range (0-indexed lines, byte columns).
    pub span: Span,
    /// Severity level.
    pub severity: Severity,
    /// Stable discriminator (e.g., "duplicate-identifier"). Parse defects have none.
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// Optional related information.
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInfo {
    /// The document containing this info.
    pub file: Arc<str>,
    pub span: Span,
    /// The message.
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn new(
        file: impl Into<Arc<str>>,
        span: Span,
        severity: Severity,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            file: file.into(),
            span,
            severity,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(file: impl Into<Arc<str>>, span: Span, message: impl Into<Arc<str>>) -> Self {
        Self::new(file, span, Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(file: impl Into<Arc<str>>, span: Span, message: impl Into<Arc<str>>) -> Self {
        Self::new(file, span, Severity::Warning, message)
    }

    /// Create a new informational diagnostic.
    pub fn info(file: impl Into<Arc<str>>, span: Span, message: impl Into<Arc<str>>) -> Self {
        Self::new(file, span, Severity::Info, message)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Add related information.
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable diagnostic codes.
///
/// Parse defects carry no code; every semantic and workspace diagnostic
/// carries one of these.
pub mod codes {
    // ========================================================================
    // DOCUMENT STRUCTURE
    // ========================================================================

    /// Identifier declared twice in one scope.
    pub const DUPLICATE_IDENTIFIER: &str = "duplicate-identifier";
    /// Description block after the first module.
    pub const MISPLACED_DESCRIPTION: &str = "misplaced-description";
    /// Second or later description block.
    pub const DUPLICATE_DESCRIPTION: &str = "duplicate-description";

    // ========================================================================
    // WORKSPACE
    // ========================================================================

    /// Dependency target that names no known symbol.
    pub const UNRESOLVED_REFERENCE: &str = "unresolved-reference";
    /// Dependency edge that is part of a cycle.
    pub const CIRCULAR_DEPENDENCY: &str = "circular-dependency";
    /// Requirement with no ticket tracking it.
    pub const NO_TICKET: &str = "no-ticket";
    /// Ticket whose reference names no known requirement.
    pub const ORPHANED_TICKET: &str = "orphaned-ticket";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during analysis.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Consume the collector and return the diagnostics.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
