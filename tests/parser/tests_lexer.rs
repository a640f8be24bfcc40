//! Lexer behaviour.

use rstest::rstest;

use blueprint::parser::{SyntaxKind, tokenize};

#[rstest]
#[case("@module auth\n")]
#[case("@depends-on a.b, c\n")]
#[case("```sql\nSELECT 1;\n```\n")]
#[case("/* open comment")]
#[case("text with 'quotes' and 42 numbers\n")]
#[case("")]
fn test_tokens_cover_input(#[case] input: &str) {
    let tokens = tokenize(input);
    let joined: String = tokens.iter().map(|t| t.text).collect();
    assert_eq!(joined, input);
    let mut expected_offset = 0u32;
    for token in &tokens {
        assert_eq!(u32::from(token.offset), expected_offset);
        expected_offset += token.text.len() as u32;
    }
}

#[rstest]
#[case("@description", SyntaxKind::DESCRIPTION_KW)]
#[case("@module", SyntaxKind::MODULE_KW)]
#[case("@feature", SyntaxKind::FEATURE_KW)]
#[case("@requirement", SyntaxKind::REQUIREMENT_KW)]
#[case("@constraint", SyntaxKind::CONSTRAINT_KW)]
#[case("@depends-on", SyntaxKind::DEPENDS_ON_KW)]
#[case("@owner", SyntaxKind::UNKNOWN_KW)]
fn test_keywords(#[case] input: &str, #[case] kind: SyntaxKind) {
    let tokens = tokenize(input);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, kind);
}

#[test]
fn test_unterminated_comment_is_flagged() {
    let tokens = tokenize("/* never closed");
    assert!(tokens[0].is_unterminated_comment());
    let closed = tokenize("/* closed */");
    assert!(!closed[0].is_unterminated_comment());
}
