//! DocumentManager lifecycle.

use std::sync::Arc;

use rstest::rstest;

use blueprint::hir::codes;
use blueprint::ide::DocumentManager;
use blueprint::parser::{DocumentParser, Parse};

const URI: &str = "file:///ws/doc.bp";

struct RejectingParser;

impl DocumentParser for RejectingParser {
    fn parse(&self, _text: &str) -> Option<Parse> {
        None
    }
}

#[rstest]
#[case::clean("@module a\n", false, 0)]
#[case::missing_name("@module\n", true, 1)]
#[case::duplicate("@module a\n@module a\n", false, 1)]
#[case::defect_and_duplicate("@module a\n@module a\n@module\n", true, 2)]
fn test_open_computes_state(
    #[case] text: &str,
    #[case] has_errors: bool,
    #[case] diagnostics: usize,
) {
    let mut manager = DocumentManager::new();
    let publish = manager.open(URI, 1, text);
    assert_eq!(publish.diagnostics.len(), diagnostics);
    let state = manager.get_state(URI).unwrap();
    assert_eq!(state.has_errors, has_errors);
    assert_eq!(state.diagnostics, publish.diagnostics);
}

#[test]
fn test_lifecycle() {
    let mut manager = DocumentManager::new();

    let opened = manager.open(URI, 1, "@module a\n");
    assert_eq!(opened.version, Some(1));
    assert!(manager.get_tree(URI).is_some());

    let changed = manager.change(URI, 2, "@module a\n@module a\n");
    assert_eq!(changed.version, Some(2));
    assert!(changed.diagnostics[0].has_code(codes::DUPLICATE_IDENTIFIER));

    let saved = manager.save(URI, 2, "@module a\n");
    assert!(saved.diagnostics.is_empty());

    let closed = manager.close(URI);
    assert_eq!(closed.version, None);
    assert!(closed.diagnostics.is_empty());
    assert!(manager.get_state(URI).is_none());
    assert!(manager.get_tree(URI).is_none());
    assert!(manager.is_empty());
}

#[test]
fn test_repeated_changes_keep_one_state() {
    let mut manager = DocumentManager::new();
    manager.open(URI, 1, "@module a\n");
    for version in 2..50 {
        manager.change(URI, version, &format!("@module m{version}\n"));
    }
    assert_eq!(manager.len(), 1);
    assert_eq!(manager.get_state(URI).unwrap().version, 49);
}

#[test]
fn test_total_parse_failure_suppresses_diagnostics() {
    let mut manager = DocumentManager::with_parser(Arc::new(RejectingParser));
    let publish = manager.open(URI, 1, "@module\n");
    assert!(publish.diagnostics.is_empty());
    let state = manager.get_state(URI).unwrap();
    assert!(state.has_errors);
    assert!(state.tree().is_none());
}

#[test]
fn test_binary_input_has_no_tree() {
    let mut manager = DocumentManager::new();
    manager.open(URI, 1, "@module a\0\n");
    let state = manager.get_state(URI).unwrap();
    assert!(state.has_errors);
    assert!(state.diagnostics.is_empty());
}

#[test]
fn test_documents_are_independent() {
    let mut manager = DocumentManager::new();
    manager.open("file:///a.bp", 1, "@module\n");
    manager.open("file:///b.bp", 1, "@module b\n");
    manager.close("file:///a.bp");
    assert!(manager.is_open("file:///b.bp"));
    assert!(!manager.get_state("file:///b.bp").unwrap().has_errors);
}

#[test]
fn test_close_unknown_document_publishes_empty() {
    let mut manager = DocumentManager::new();
    let publish = manager.close(URI);
    assert!(publish.diagnostics.is_empty());
    assert_eq!(publish.uri.as_ref(), URI);
}
