//! Symbol index: path derivation, replacement and resolution.

use rstest::rstest;

use crate::helpers::workspace_helpers::index_from;
use blueprint::hir::{SymbolIndex, SymbolKind};
use blueprint::parser::parse_blueprint;

const AUTH: &str = r#"
@module auth
  Authentication.
  @feature login
    @requirement basic
      Users log in with a password.
      @constraint bcrypt
        Cost factor 12.
    @requirement oauth
  @feature logout
"#;

#[rstest]
#[case("auth", SymbolKind::Module)]
#[case("auth.login", SymbolKind::Feature)]
#[case("auth.login.basic", SymbolKind::Requirement)]
#[case("auth.login.basic.bcrypt", SymbolKind::Constraint)]
#[case("auth.login.oauth", SymbolKind::Requirement)]
#[case("auth.logout", SymbolKind::Feature)]
fn test_paths_follow_containment(#[case] path: &str, #[case] kind: SymbolKind) {
    let index = index_from(&[("file:///auth.bp", AUTH)]);
    let symbols = index.get_symbol(path).expect("path should be indexed");
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].kind, kind);
    assert_eq!(symbols[0].file.as_ref(), "file:///auth.bp");
}

#[test]
fn test_symbols_by_kind() {
    let index = index_from(&[("file:///auth.bp", AUTH)]);
    assert_eq!(index.get_symbols_by_kind(SymbolKind::Module).len(), 1);
    assert_eq!(index.get_symbols_by_kind(SymbolKind::Feature).len(), 2);
    assert_eq!(index.get_symbols_by_kind(SymbolKind::Requirement).len(), 2);
    assert_eq!(index.get_symbols_by_kind(SymbolKind::Constraint).len(), 1);
}

#[test]
fn test_duplicates_are_kept() {
    let index = index_from(&[
        ("file:///a.bp", "@module shared\n@module shared\n"),
        ("file:///b.bp", "@module shared\n"),
    ]);
    assert_eq!(index.get_symbol("shared").map(|s| s.len()), Some(3));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_readd_replaces_file_content() {
    let mut index = SymbolIndex::new();
    index.add_file("file:///a.bp", &parse_blueprint("@module old\n  @feature f\n"));
    index.add_file("file:///a.bp", &parse_blueprint("@module new\n"));
    assert!(index.get_symbol("old").is_none());
    assert!(index.get_symbol("old.f").is_none());
    assert!(index.get_symbol("new").is_some());
    assert_eq!(index.symbols_in_file("file:///a.bp").len(), 1);
}

#[test]
fn test_remove_file_keeps_other_files() {
    let mut index = index_from(&[
        ("file:///a.bp", "@module shared\n@module a\n"),
        ("file:///b.bp", "@module shared\n"),
    ]);
    index.remove_file("file:///a.bp");
    assert!(index.get_symbol("a").is_none());
    let shared = index.get_symbol("shared").unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].file.as_ref(), "file:///b.bp");
    assert!(!index.contains_file("file:///a.bp"));
}

#[test]
fn test_remove_unknown_file_is_noop() {
    let mut index = index_from(&[("file:///a.bp", "@module a\n")]);
    index.remove_file("file:///missing.bp");
    assert_eq!(index.file_count(), 1);
}

#[test]
fn test_resolve_reference_across_files() {
    let index = index_from(&[
        ("file:///auth.bp", "@module auth\n  @depends-on storage.users\n"),
        ("file:///storage.bp", "@module storage\n  @feature users\n"),
    ]);
    let auth = &index.get_symbol("auth").unwrap()[0];
    let reference = &auth.dependencies[0];
    assert_eq!(reference.raw_parts.len(), 2);
    let resolved = index.resolve_reference(reference);
    assert!(resolved.is_resolved());
    assert_eq!(resolved.symbol.unwrap().file.as_ref(), "file:///storage.bp");
}

#[test]
fn test_unresolved_reference_is_not_an_error() {
    let index = index_from(&[("file:///a.bp", "@module a\n  @depends-on nowhere\n")]);
    let a = &index.get_symbol("a").unwrap()[0];
    assert!(index.resolve_reference(&a.dependencies[0]).symbol.is_none());
}

#[test]
fn test_recovered_declarations_are_indexed() {
    // Requirement outside any feature is wrapped in an error region
    let index = index_from(&[("file:///a.bp", "@requirement lonely\n@module m\n")]);
    assert!(index.get_symbol("lonely").is_some());
    assert!(index.get_symbol("m").is_some());
}

#[test]
fn test_nameless_declaration_is_skipped() {
    let index = index_from(&[("file:///a.bp", "@module\n  @feature f\n@module b\n")]);
    assert!(index.get_symbol("f").is_none());
    assert!(index.get_symbol("b").is_some());
}

#[test]
fn test_symbol_node_resolves_in_its_tree() {
    let parse = parse_blueprint(AUTH);
    let mut index = SymbolIndex::new();
    index.add_file("file:///auth.bp", &parse);
    let login = &index.get_symbol("auth.login").unwrap()[0];
    let node = login.resolve_node(&parse.syntax()).unwrap();
    assert!(node.text().to_string().trim_start().starts_with("@feature login"));
    assert_eq!(login.parent_path(), Some("auth"));
}
