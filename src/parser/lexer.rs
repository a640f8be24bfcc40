//! Logos-based lexer for Blueprint
//!
//! Fast tokenization using the logos crate. Fenced code blocks are the one
//! context-sensitive construct: once an opening fence is seen at the start of
//! a line, lines are emitted raw as `CODE_TEXT` until a closing fence, so
//! keywords and comment markers inside code samples never become tokens.

use std::collections::VecDeque;

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    /// A block comment whose closing `*/` never appeared
    pub fn is_unterminated_comment(&self) -> bool {
        self.kind == SyntaxKind::BLOCK_COMMENT
            && !(self.text.len() >= 4 && self.text.ends_with("*/"))
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    input: &'a str,
    inner: logos::Lexer<'a, LogosToken>,
    /// Byte offset of `inner`'s input within `input`
    base: usize,
    pending: VecDeque<Token<'a>>,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            inner: LogosToken::lexer(input),
            base: 0,
            pending: VecDeque::new(),
            at_line_start: true,
        }
    }

    fn push(&mut self, kind: SyntaxKind, start: usize, end: usize) {
        self.pending.push_back(Token {
            kind,
            text: &self.input[start..end],
            offset: TextSize::new(start as u32),
        });
    }

    /// End of the line containing `pos` (index of `\n`, or input length) and
    /// the end of its content (before any `\r`).
    fn line_bounds(&self, pos: usize) -> (usize, usize) {
        let line_end = self.input[pos..]
            .find('\n')
            .map(|i| pos + i)
            .unwrap_or(self.input.len());
        let content_end = if line_end > pos && self.input.as_bytes()[line_end - 1] == b'\r' {
            line_end - 1
        } else {
            line_end
        };
        (line_end, content_end)
    }

    /// Emit the remainder of a fence line (whitespace, info string, line break).
    ///
    /// Returns the position after the line and whether an info string was present.
    fn push_rest_of_line(&mut self, start: usize) -> (usize, bool) {
        let (line_end, content_end) = self.line_bounds(start);
        let segment = &self.input[start..content_end];
        let indent = segment.len() - segment.trim_start_matches([' ', '\t']).len();
        if indent > 0 {
            self.push(SyntaxKind::WHITESPACE, start, start + indent);
        }
        let has_info = !segment.trim().is_empty();
        if has_info {
            self.push(SyntaxKind::TEXT, start + indent, content_end);
        }
        (self.push_line_break(content_end, line_end), has_info)
    }

    fn push_line_break(&mut self, content_end: usize, line_end: usize) -> usize {
        if line_end < self.input.len() {
            self.push(SyntaxKind::NEWLINE, content_end, line_end + 1);
            line_end + 1
        } else {
            if content_end < line_end {
                self.push(SyntaxKind::WHITESPACE, content_end, line_end);
            }
            line_end
        }
    }

    /// Lex a fenced code block starting at an opening fence, then resume
    /// normal lexing after its closing fence (or at end of input).
    fn lex_fenced_block(&mut self, fence_start: usize, fence_end: usize) {
        self.push(SyntaxKind::CODE_FENCE, fence_start, fence_end);
        let (mut pos, _) = self.push_rest_of_line(fence_end);

        while pos < self.input.len() {
            let (line_end, content_end) = self.line_bounds(pos);
            let line = &self.input[pos..content_end];
            let indent = line.len() - line.trim_start_matches([' ', '\t']).len();

            if line[indent..].starts_with("```") {
                if indent > 0 {
                    self.push(SyntaxKind::WHITESPACE, pos, pos + indent);
                }
                let fence = pos + indent;
                self.push(SyntaxKind::CODE_FENCE, fence, fence + 3);
                let (next, has_info) = self.push_rest_of_line(fence + 3);
                pos = next;
                // A fence carrying an info string opens, it never closes
                if !has_info {
                    break;
                }
            } else {
                if content_end > pos {
                    self.push(SyntaxKind::CODE_TEXT, pos, content_end);
                }
                pos = self.push_line_break(content_end, line_end);
            }
        }

        self.base = pos;
        self.inner = LogosToken::lexer(&self.input[pos..]);
        self.at_line_start = true;
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }

        let logos_token = self.inner.next()?;
        let span = self.inner.span();
        let (start, end) = (self.base + span.start, self.base + span.end);

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::TEXT,
        };

        if kind == SyntaxKind::CODE_FENCE && self.at_line_start {
            self.lex_fenced_block(start, end);
            return self.pending.pop_front();
        }

        self.at_line_start = match kind {
            SyntaxKind::NEWLINE => true,
            SyntaxKind::WHITESPACE => self.at_line_start,
            _ => false,
        };

        // Fences in the middle of a line are plain prose
        let kind = if kind == SyntaxKind::CODE_FENCE {
            SyntaxKind::TEXT
        } else {
            kind
        };

        Some(Token {
            kind,
            text: &self.input[start..end],
            offset: TextSize::new(start as u32),
        })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Consume a block comment up to and including `*/`, or to end of input.
fn block_comment(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    let rest = lex.remainder();
    let len = rest.find("*/").map(|i| i + 2).unwrap_or(rest.len());
    lex.bump(len);
    true
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // =========================================================================
    // KEYWORDS (exact spellings win over the generic `@word` pattern)
    // =========================================================================
    #[token("@description")]
    DescriptionKw,
    #[token("@module")]
    ModuleKw,
    #[token("@feature")]
    FeatureKw,
    #[token("@requirement")]
    RequirementKw,
    #[token("@constraint")]
    ConstraintKw,
    #[token("@depends-on")]
    DependsOnKw,
    #[regex(r"@[a-zA-Z_][a-zA-Z0-9_-]*")]
    UnknownKw,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[regex(r"[0-9][a-zA-Z0-9_-]*")]
    Number,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("```")]
    CodeFence,

    // Everything else is prose
    #[regex("``?")]
    Backticks,
    #[token("@")]
    At,
    #[token("/")]
    Slash,
    #[regex(r"[^ \t\r\na-zA-Z0-9_@.,/`]+")]
    Text,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace => SyntaxKind::WHITESPACE,
            Newline => SyntaxKind::NEWLINE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,

            DescriptionKw => SyntaxKind::DESCRIPTION_KW,
            ModuleKw => SyntaxKind::MODULE_KW,
            FeatureKw => SyntaxKind::FEATURE_KW,
            RequirementKw => SyntaxKind::REQUIREMENT_KW,
            ConstraintKw => SyntaxKind::CONSTRAINT_KW,
            DependsOnKw => SyntaxKind::DEPENDS_ON_KW,
            UnknownKw => SyntaxKind::UNKNOWN_KW,

            Ident => SyntaxKind::IDENT,
            Number => SyntaxKind::NUMBER,

            Dot => SyntaxKind::DOT,
            Comma => SyntaxKind::COMMA,
            CodeFence => SyntaxKind::CODE_FENCE,

            Backticks | At | Slash | Text => SyntaxKind::TEXT,
        }
    }
}
