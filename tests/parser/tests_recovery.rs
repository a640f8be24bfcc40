//! Recovery keeps the tree lossless and marks defects.

use rstest::rstest;

use blueprint::parser::{AstNode, SourceFile, SyntaxKind, contains_error, parse_blueprint};

#[rstest]
#[case::clean("@description\n  Intro.\n@module a\n  @feature b\n    @requirement c\n")]
#[case::missing_name("@module\n  @feature\n")]
#[case::orphans("@requirement r\n  text\n@constraint c\n@module m\n")]
#[case::bad_references("@module m\n  @depends-on .a, b..c, d., , e f\n")]
#[case::unclosed_fence("@module m\n```\nno end")]
#[case::nested_fence("@module m\n```\n```rust\n```\n")]
#[case::unknown_keywords("@owner alice\n@module m\n  @status done\n")]
#[case::crlf("@module m\r\n  @feature f\r\n")]
#[case::unicode("@module m\n  Über café ✓\n")]
fn test_tree_is_lossless(#[case] source: &str) {
    let parse = parse_blueprint(source);
    assert_eq!(parse.syntax().text().to_string(), source);
}

#[rstest]
#[case("@module m\n", false)]
#[case("@module\n", true)]
#[case("@module m\n```\n", true)]
#[case("@feature f\n", true)]
#[case("@module m\n  @depends-on a,\n", true)]
fn test_error_markers(#[case] source: &str, #[case] has_errors: bool) {
    let parse = parse_blueprint(source);
    assert_eq!(parse.has_errors(), has_errors);
    assert_eq!(contains_error(&parse.syntax()), has_errors);
    assert_eq!(parse.ok(), !has_errors);
}

#[test]
fn test_typed_ast_walk() {
    let parse = parse_blueprint(
        "@description\n  Intro.\n@module auth\n  @feature login\n    @depends-on storage.users\n",
    );
    let file = SourceFile::cast(parse.syntax()).unwrap();
    assert_eq!(file.descriptions().count(), 1);

    let modules: Vec<_> = file.declarations().collect();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].kind(), SyntaxKind::MODULE);

    let login = modules[0].children().next().unwrap();
    assert_eq!(login.name().and_then(|n| n.text()).as_deref(), Some("login"));
    let reference = login
        .depends_on()
        .flat_map(|d| d.references().collect::<Vec<_>>())
        .next()
        .unwrap();
    assert_eq!(reference.path(), "storage.users");
    assert!(!reference.is_malformed());
}

#[test]
fn test_nested_fence_is_marked() {
    let parse = parse_blueprint("@module m\n```\n```rust\n```\n");
    assert!(
        parse
            .syntax()
            .descendants()
            .any(|n| n.kind() == SyntaxKind::ERROR
                && n.parent().map(|p| p.kind()) == Some(SyntaxKind::CODE_BLOCK))
    );
}
