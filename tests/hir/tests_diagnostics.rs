//! Document and workspace diagnostics.

use rstest::rstest;

use crate::helpers::diagnostic_helpers::*;
use crate::helpers::workspace_helpers::index_from;
use blueprint::hir::checks::check_workspace_document;
use blueprint::hir::{
    AnalysisOptions, DependencyGraph, Severity, Ticket, TicketStatus, TicketStore, codes,
};

// =============================================================================
// PARSE DEFECTS
// =============================================================================

#[rstest]
#[case::missing_module_name("@module\n", "Expected a module name after @module")]
#[case::missing_requirement_name(
    "@module m\n  @feature f\n    @requirement\n",
    "Expected a requirement name after @requirement"
)]
#[case::unclosed_code_block("@module m\n```\nlet x = 1;\n", "Unclosed code block: add a closing ```")]
#[case::unclosed_comment("@module m\n/* never", "Unclosed block comment: add a closing */")]
#[case::trailing_comma("@module m\n  @depends-on a,\n", "Trailing ',' in @depends-on")]
#[case::leading_comma("@module m\n  @depends-on , a\n", "Missing dependency target before ','")]
#[case::empty_depends_on(
    "@module m\n  @depends-on\n",
    "Empty @depends-on declaration: expected at least one target"
)]
#[case::leading_digit("@module 1abc\n", "Identifier '1abc' cannot start with a digit")]
#[case::space_in_identifier(
    "@module my module\n",
    "Identifier cannot contain spaces: 'my module'; use '-' or '_' to join words"
)]
#[case::doubled_space_in_identifier(
    "@module my  module\n",
    "Identifier cannot contain spaces: 'my  module'; use '-' or '_' to join words"
)]
#[case::dotted_identifier(
    "@module foo.bar\n",
    "Identifier cannot contain '.': 'foo.bar'; nest a block to declare a member"
)]
#[case::requirement_at_top_level("@requirement r\n", "@requirement must be inside a @feature block")]
#[case::feature_at_top_level("@feature f\n", "@feature must be inside a @module block")]
#[case::depends_on_in_constraint(
    "@module m\n  @constraint c\n    @depends-on x\n",
    "@depends-on is not allowed inside a @constraint block"
)]
#[case::missing_comma(
    "@module m\n  @depends-on a b\n",
    "Missing ',' between dependency targets before 'b'"
)]
#[case::leading_dot("@module m\n  @depends-on .a\n", "Reference cannot start with '.'")]
#[case::trailing_dot("@module m\n  @depends-on a.\n", "Reference cannot end with '.'")]
#[case::doubled_dot("@module m\n  @depends-on a..b\n", "Reference contains an empty segment ('..')")]
#[case::text_outside_block(
    "stray words\n@module m\n",
    "Text must be inside a @description or @module block"
)]
fn test_parse_defect_messages(#[case] source: &str, #[case] expected: &str) {
    let messages = defect_messages(source);
    assert_eq!(messages, vec![expected.to_string()], "source: {source:?}");
}

#[test]
fn test_unknown_keyword_lists_keywords() {
    let messages = defect_messages("@module m\n  @owner alice\n");
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Unknown keyword '@owner'"));
    assert!(messages[0].contains("@depends-on"));
}

#[test]
fn test_parse_defects_are_errors_without_code() {
    let diagnostics = document_diagnostics("@module\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert!(diagnostics[0].code.is_none());
    assert!(diagnostics[0].span.is_empty());
}

#[test]
fn test_long_unexpected_text_is_truncated() {
    let options = AnalysisOptions::default();
    let long = "x".repeat(200);
    let snippet = options.snippet(&long);
    assert!(snippet.ends_with("..."));
    assert!(snippet.chars().count() <= options.max_snippet_len + 3);
}

#[test]
fn test_clean_document_has_no_diagnostics() {
    let source = r#"@description
  Product requirements.

@module auth
  @feature login
    @requirement basic
      Users log in.
      ```text
      POST /login
      ```
      @constraint bcrypt
        Cost 12.
"#;
    let diagnostics = document_diagnostics(source);
    assert!(diagnostics.is_empty(), "{}", format_messages(&diagnostics));
}

// =============================================================================
// DUPLICATE IDENTIFIERS
// =============================================================================

#[test]
fn test_duplicate_requirement_in_feature() {
    let source = "@module m\n  @feature f\n    @requirement login\n    @requirement login\n";
    let diagnostics = document_diagnostics(source);
    let duplicates = with_code(&diagnostics, codes::DUPLICATE_IDENTIFIER);
    assert_eq!(duplicates.len(), 1, "{}", format_messages(&diagnostics));
    let duplicate = &duplicates[0];
    assert_eq!(duplicate.severity, Severity::Error);
    assert_eq!(duplicate.span.start.line, 3);
    assert!(duplicate.message.contains("line 3"), "{}", duplicate.message);
    assert_eq!(duplicate.related.len(), 1);
    assert_eq!(duplicate.related[0].span.start.line, 2);
}

#[rstest]
#[case::same_name_other_feature(
    "@module m\n  @feature a\n    @requirement r\n  @feature b\n    @requirement r\n",
    0
)]
#[case::same_name_other_module("@module a\n  @feature f\n@module b\n  @feature f\n", 0)]
#[case::three_declarations("@module m\n@module m\n@module m\n", 2)]
#[case::duplicate_feature("@module m\n  @feature f\n  @feature f\n", 1)]
#[case::members_of_duplicate_module(
    "@module m\n  @feature f\n    @requirement r\n@module m\n  @feature f\n    @requirement r\n",
    1
)]
fn test_duplicates_follow_scope(#[case] source: &str, #[case] expected: usize) {
    let diagnostics = document_diagnostics(source);
    assert_eq!(
        with_code(&diagnostics, codes::DUPLICATE_IDENTIFIER).len(),
        expected,
        "{}",
        format_messages(&diagnostics)
    );
}

// =============================================================================
// DESCRIPTION PLACEMENT
// =============================================================================

#[test]
fn test_description_after_module() {
    let diagnostics = document_diagnostics("@module m\n@description\n  Late.\n");
    let misplaced = with_code(&diagnostics, codes::MISPLACED_DESCRIPTION);
    assert_eq!(misplaced.len(), 1);
    assert_eq!(misplaced[0].span.start.line, 1);
    assert_eq!(misplaced[0].severity, Severity::Warning);
    assert!(with_code(&diagnostics, codes::DUPLICATE_DESCRIPTION).is_empty());
}

#[rstest]
#[case::two("@description\n  a\n@description\n  b\n@module m\n", 1)]
#[case::three("@description\n  a\n@description\n  b\n@description\n  c\n", 2)]
#[case::after_module("@description\n  a\n@module m\n@description\n  b\n", 1)]
fn test_duplicate_descriptions(#[case] source: &str, #[case] expected: usize) {
    let diagnostics = document_diagnostics(source);
    assert_eq!(
        with_code(&diagnostics, codes::DUPLICATE_DESCRIPTION).len(),
        expected
    );
    assert!(with_code(&diagnostics, codes::MISPLACED_DESCRIPTION).is_empty());
}

#[test]
fn test_description_before_module_is_clean() {
    assert!(document_diagnostics("@description\n  Intro.\n@module m\n").is_empty());
}

// =============================================================================
// WORKSPACE DIAGNOSTICS
// =============================================================================

#[test]
fn test_unresolved_reference_severity_is_configurable() {
    let index = index_from(&[("file:///a.bp", "@module a\n  @depends-on ghost\n")]);
    let graph = DependencyGraph::build(&index);
    let options = AnalysisOptions {
        unresolved_reference_severity: Severity::Hint,
        ..AnalysisOptions::default()
    };
    let diagnostics =
        check_workspace_document("file:///a.bp", &index, &graph, &TicketStore::new(), &options);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Hint);
    assert!(diagnostics[0].message.contains("ghost"));
}

#[test]
fn test_malformed_reference_is_only_a_parse_defect() {
    let source = "@module a\n  @depends-on a..ghost\n";
    let index = index_from(&[("file:///a.bp", source)]);
    let graph = DependencyGraph::build(&index);
    let workspace = check_workspace_document(
        "file:///a.bp",
        &index,
        &graph,
        &TicketStore::new(),
        &AnalysisOptions::default(),
    );
    assert!(workspace.is_empty(), "{}", format_messages(&workspace));
    assert_eq!(
        defect_messages(source),
        vec!["Reference contains an empty segment ('..')"]
    );
}

#[test]
fn test_cycle_diagnostic_on_each_edge() {
    let index = index_from(&[(
        "file:///a.bp",
        "@module a\n  @depends-on b\n@module b\n  @depends-on a\n",
    )]);
    let graph = DependencyGraph::build(&index);
    let diagnostics = check_workspace_document(
        "file:///a.bp",
        &index,
        &graph,
        &TicketStore::new(),
        &AnalysisOptions::default(),
    );
    let cycles = with_code(&diagnostics, codes::CIRCULAR_DEPENDENCY);
    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles[0].span.start.line, 1);
    assert_eq!(cycles[1].span.start.line, 3);
}

#[test]
fn test_covered_requirement_has_no_ticket_diagnostic() {
    let index = index_from(&[(
        "file:///a.bp",
        "@module m\n  @feature f\n    @requirement covered\n    @requirement bare\n",
    )]);
    let graph = DependencyGraph::build(&index);
    let mut tickets = TicketStore::new();
    tickets.set_tickets(
        "file:///tickets.json",
        vec![Ticket::new("T-1", "m.f.covered", TicketStatus::InProgress)],
    );
    let diagnostics = check_workspace_document(
        "file:///a.bp",
        &index,
        &graph,
        &tickets,
        &AnalysisOptions::default(),
    );
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].has_code(codes::NO_TICKET));
    assert!(diagnostics[0].message.contains("m.f.bare"));
}
