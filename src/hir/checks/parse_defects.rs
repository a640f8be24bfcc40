//! Messages for parse defects.
//!
//! Every `MISSING` node yields a message chosen by its parent's kind. Every
//! `ERROR` node is matched against [`ERROR_RULES`] in order; the first rule
//! whose predicate holds builds the message.

use std::sync::Arc;

use crate::base::{LineIndex, Span, TextRange};
use crate::hir::diagnostics::Diagnostic;
use crate::hir::options::AnalysisOptions;
use crate::parser::{
    SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, is_error, is_missing, keywords,
    missing_kind,
};

/// What a rule gets to look at
pub struct DefectContext<'a> {
    pub node: &'a SyntaxNode,
    /// Node text without surrounding whitespace
    pub text: String,
    pub parent: Option<SyntaxKind>,
    /// First non-trivia token inside the node
    pub first_token: Option<SyntaxToken>,
    /// First child node, if the error wraps parsed structure
    pub first_child: Option<SyntaxKind>,
    pub options: &'a AnalysisOptions,
}

impl<'a> DefectContext<'a> {
    pub fn new(node: &'a SyntaxNode, options: &'a AnalysisOptions) -> Self {
        let first_token = node
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia() && t.kind() != SyntaxKind::NEWLINE);
        Self {
            node,
            text: node.text().to_string().trim().to_string(),
            parent: node.parent().map(|p| p.kind()),
            first_token,
            first_child: node.first_child().map(|c| c.kind()),
            options,
        }
    }

    fn first_token_kind(&self) -> Option<SyntaxKind> {
        self.first_token.as_ref().map(|t| t.kind())
    }

    fn parent_is_declaration(&self) -> bool {
        self.parent.is_some_and(|p| p.is_declaration())
    }
}

/// One entry of the ordered rule table
pub struct ErrorRule {
    pub name: &'static str,
    pub matches: fn(&DefectContext) -> bool,
    pub message: fn(&DefectContext) -> String,
}

/// Heuristics for `ERROR` nodes, highest priority first
pub const ERROR_RULES: &[ErrorRule] = &[
    ErrorRule {
        name: "nested-code-fence",
        matches: |cx| {
            cx.parent == Some(SyntaxKind::CODE_BLOCK)
                && cx.first_token_kind() == Some(SyntaxKind::CODE_FENCE)
        },
        message: |_| {
            "Nested code fence: close the open ``` block before starting a new one".to_string()
        },
    },
    ErrorRule {
        name: "block-outside-container",
        matches: |cx| {
            cx.parent == Some(SyntaxKind::SOURCE_FILE)
                && matches!(
                    cx.first_child,
                    Some(
                        SyntaxKind::FEATURE
                            | SyntaxKind::REQUIREMENT
                            | SyntaxKind::CONSTRAINT
                            | SyntaxKind::DEPENDS_ON
                    )
                )
        },
        message: |cx| {
            let kind = cx.first_child.unwrap_or(SyntaxKind::ERROR);
            let keyword = keywords::spelling(kind).unwrap_or("keyword");
            let container = match kind {
                SyntaxKind::FEATURE => keywords::MODULE.to_string(),
                SyntaxKind::REQUIREMENT => keywords::FEATURE.to_string(),
                SyntaxKind::CONSTRAINT => keywords::REQUIREMENT.to_string(),
                _ => format!(
                    "{}, {} or {}",
                    keywords::MODULE,
                    keywords::FEATURE,
                    keywords::REQUIREMENT
                ),
            };
            format!("{keyword} must be inside a {container} block")
        },
    },
    ErrorRule {
        name: "keyword-in-wrong-context",
        matches: |cx| {
            cx.first_child == Some(SyntaxKind::DEPENDS_ON)
                && cx.parent == Some(SyntaxKind::CONSTRAINT)
        },
        message: |cx| {
            let parent = cx.parent.and_then(keywords::spelling).unwrap_or("this block");
            format!(
                "{} is not allowed inside a {parent} block",
                keywords::DEPENDS_ON
            )
        },
    },
    ErrorRule {
        name: "unknown-keyword",
        matches: |cx| cx.first_token_kind() == Some(SyntaxKind::UNKNOWN_KW),
        message: |cx| {
            let keyword = cx
                .first_token
                .as_ref()
                .map(|t| t.text().to_string())
                .unwrap_or_default();
            format!(
                "Unknown keyword '{keyword}'; expected one of {}",
                keywords::ALL.join(", ")
            )
        },
    },
    ErrorRule {
        name: "leading-digit",
        matches: |cx| {
            cx.parent_is_declaration() && cx.first_token_kind() == Some(SyntaxKind::NUMBER)
        },
        message: |cx| {
            format!(
                "Identifier '{}' cannot start with a digit",
                cx.options.snippet(&cx.text)
            )
        },
    },
    ErrorRule {
        name: "space-in-identifier",
        matches: |cx| {
            cx.parent_is_declaration()
                && name_before(cx.node).is_some_and(|(_, gap)| {
                    gap.chars().next().is_some_and(|c| c == ' ' || c == '\t')
                })
        },
        message: |cx| {
            let joined = name_before(cx.node)
                .map(|(name, gap)| format!("{}{gap}{}", name.text(), cx.text))
                .unwrap_or_default();
            format!(
                "Identifier cannot contain spaces: '{}'; use '-' or '_' to join words",
                cx.options.snippet(&joined)
            )
        },
    },
    ErrorRule {
        name: "dotted-declaration-name",
        matches: |cx| {
            cx.parent_is_declaration()
                && cx.first_token_kind() == Some(SyntaxKind::DOT)
                && name_before(cx.node).is_some_and(|(_, gap)| gap.is_empty())
        },
        message: |cx| {
            let joined = name_before(cx.node)
                .map(|(name, _)| format!("{}{}", name.text(), cx.text))
                .unwrap_or_default();
            format!(
                "Identifier cannot contain '.': '{}'; nest a block to declare a member",
                cx.options.snippet(&joined)
            )
        },
    },
    ErrorRule {
        name: "malformed-reference",
        matches: |cx| {
            cx.parent == Some(SyntaxKind::REFERENCE)
                && cx.first_token_kind() == Some(SyntaxKind::DOT)
        },
        message: |cx| {
            let ident_before = cx
                .node
                .parent()
                .into_iter()
                .flat_map(|reference| reference.children_with_tokens().collect::<Vec<_>>())
                .filter_map(|e| e.into_token())
                .any(|t| {
                    t.kind() == SyntaxKind::IDENT
                        && t.text_range().end() <= cx.node.text_range().start()
                });
            let previous = cx.node.prev_sibling_or_token().map(|e| e.kind());
            if !ident_before {
                "Reference cannot start with '.'".to_string()
            } else if previous == Some(SyntaxKind::DOT) {
                "Reference contains an empty segment ('..')".to_string()
            } else {
                "Reference cannot end with '.'".to_string()
            }
        },
    },
    ErrorRule {
        name: "missing-comma",
        matches: |cx| {
            cx.parent == Some(SyntaxKind::DEPENDS_ON)
                && cx.node.prev_sibling().map(|s| s.kind()) == Some(SyntaxKind::REFERENCE)
                && cx.text.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        },
        message: |cx| {
            format!(
                "Missing ',' between dependency targets before '{}'",
                cx.options.snippet(&cx.text)
            )
        },
    },
    ErrorRule {
        name: "invalid-dependency-target",
        matches: |cx| cx.parent == Some(SyntaxKind::DEPENDS_ON),
        message: |cx| {
            format!(
                "Invalid dependency target '{}'; expected a dotted path such as module.feature",
                cx.options.snippet(&cx.text)
            )
        },
    },
    ErrorRule {
        name: "text-outside-block",
        matches: |cx| {
            cx.parent == Some(SyntaxKind::SOURCE_FILE)
                && cx.first_child.is_none()
                && !cx.first_token_kind().is_some_and(|k| k.is_keyword())
        },
        message: |_| {
            format!(
                "Text must be inside a {} or {} block",
                keywords::DESCRIPTION,
                keywords::MODULE
            )
        },
    },
];

/// Message for an `ERROR` node: the first matching rule, else a generic one
pub fn error_message(cx: &DefectContext) -> String {
    ERROR_RULES
        .iter()
        .find(|rule| (rule.matches)(cx))
        .map(|rule| (rule.message)(cx))
        .unwrap_or_else(|| format!("Unexpected '{}'", cx.options.snippet(&cx.text)))
}

/// Message for a `MISSING` node, keyed by its parent's kind
pub fn missing_message(node: &SyntaxNode) -> String {
    let expected = missing_kind(node).unwrap_or(SyntaxKind::ERROR);
    let Some(parent) = node.parent() else {
        return format!("Missing {}", expected.display_name());
    };

    match parent.kind() {
        kind if kind.is_declaration() => format!(
            "Expected a {} name after {}",
            kind.display_name(),
            keywords::spelling(kind).unwrap_or("keyword")
        ),
        SyntaxKind::CODE_BLOCK => "Unclosed code block: add a closing ```".to_string(),
        SyntaxKind::COMMENT => "Unclosed block comment: add a closing */".to_string(),
        SyntaxKind::DEPENDS_ON => {
            let previous = significant_neighbour(node, Direction::Prev);
            let next = significant_neighbour(node, Direction::Next);
            match (previous, next) {
                (Some(SyntaxKind::COMMA), _) => {
                    format!("Trailing ',' in {}", keywords::DEPENDS_ON)
                }
                (_, Some(SyntaxKind::COMMA)) => "Missing dependency target before ','".to_string(),
                _ => format!(
                    "Empty {} declaration: expected at least one target",
                    keywords::DEPENDS_ON
                ),
            }
        }
        _ => format!("Missing {}", expected.display_name()),
    }
}

/// Collect one diagnostic per defect node, in document order
pub fn check_parse_defects(
    file: &Arc<str>,
    root: &SyntaxNode,
    line_index: &LineIndex,
    options: &AnalysisOptions,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for node in root.descendants() {
        let message = if is_missing(&node) {
            missing_message(&node)
        } else if is_error(&node) {
            error_message(&DefectContext::new(&node, options))
        } else {
            continue;
        };
        let span = defect_span(&node, line_index);
        diagnostics.push(Diagnostic::error(file.clone(), span, message));
    }
    diagnostics
}

/// Range of the first line of `node`, without surrounding trivia
fn first_line_range(node: &SyntaxNode) -> TextRange {
    let mut start = None;
    let mut end = None;
    for token in node.descendants_with_tokens().filter_map(|e| e.into_token()) {
        if token.kind() == SyntaxKind::NEWLINE {
            if start.is_some() {
                break;
            }
            continue;
        }
        if token.kind() == SyntaxKind::WHITESPACE {
            continue;
        }
        start.get_or_insert(token.text_range().start());
        end = Some(token.text_range().end());
    }
    match (start, end) {
        (Some(start), Some(end)) => TextRange::new(start, end),
        _ => node.text_range(),
    }
}

/// The `NAME` node this error follows on the same header line, with the
/// trivia text in between
fn name_before(node: &SyntaxNode) -> Option<(SyntaxNode, String)> {
    let mut gap = Vec::new();
    let mut element = node.prev_sibling_or_token();
    while let Some(current) = element {
        match current {
            SyntaxElement::Token(token) if token.kind().is_trivia() => {
                element = token.prev_sibling_or_token();
                gap.push(token);
            }
            SyntaxElement::Node(prev) if prev.kind() == SyntaxKind::NAME => {
                let gap = gap.iter().rev().map(|t| t.text()).collect();
                return Some((prev, gap));
            }
            _ => return None,
        }
    }
    None
}

enum Direction {
    Prev,
    Next,
}

fn significant_neighbour(node: &SyntaxNode, direction: Direction) -> Option<SyntaxKind> {
    let step = |e: &SyntaxElement| match direction {
        Direction::Prev => e.prev_sibling_or_token(),
        Direction::Next => e.next_sibling_or_token(),
    };
    let mut element = step(&SyntaxElement::Node(node.clone()));
    while let Some(current) = element {
        if !current.kind().is_trivia() {
            return Some(current.kind());
        }
        element = step(&current);
    }
    None
}

/// Zero-width for `MISSING`, first line for `ERROR`
pub fn defect_span(node: &SyntaxNode, line_index: &LineIndex) -> Span {
    if is_missing(node) {
        line_index.span(node.text_range())
    } else {
        line_index.span(first_line_range(node))
    }
}
