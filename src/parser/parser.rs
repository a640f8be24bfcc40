//! Recursive descent parser for Blueprint
//!
//! Builds a rowan GreenNode tree from tokens. The tree is lossless and never
//! fails: input the grammar cannot place is wrapped in `ERROR` nodes and
//! expected-but-absent tokens become zero-width `MISSING` nodes. Diagnostics
//! are derived from those markers later, so the parser itself keeps no error
//! list.

use std::sync::Arc;

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use crate::base::LineIndex;
use rowan::{GreenNode, GreenNodeBuilder};

/// Parse result: the green tree plus the line table of its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub green: GreenNode,
    line_index: Arc<LineIndex>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Check whether any node in the tree is an `ERROR` or `MISSING` marker
    pub fn has_errors(&self) -> bool {
        super::ast::contains_error(&self.syntax())
    }

    /// Check if parsing succeeded without defects
    pub fn ok(&self) -> bool {
        !self.has_errors()
    }
}

/// The parser collaborator consumed by document management.
///
/// `None` signals total parse failure: the input could not be turned into a
/// tree at all, as opposed to a tree carrying error markers.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, text: &str) -> Option<Parse>;
}

/// The bundled Blueprint parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlueprintParser;

impl DocumentParser for BlueprintParser {
    fn parse(&self, text: &str) -> Option<Parse> {
        // Binary content is not a document
        if text.contains('\0') {
            return None;
        }
        Some(parse_blueprint(text))
    }
}

/// Parse Blueprint source text into a CST
pub fn parse_blueprint(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    Parse {
        green: parser.builder.finish(),
        line_index: Arc::new(LineIndex::new(input)),
    }
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> Option<SyntaxKind> {
        self.current().map(|t| t.kind)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == Some(kind)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn at_line_end(&self) -> bool {
        matches!(self.current_kind(), None | Some(SyntaxKind::NEWLINE))
    }

    /// Raw lookahead, trivia included
    fn nth_raw(&self, n: usize) -> Option<SyntaxKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    /// Next token that is neither trivia nor a line break
    fn peek_significant(&self) -> Option<SyntaxKind> {
        self.tokens[self.pos..]
            .iter()
            .map(|t| t.kind)
            .find(|k| !k.is_trivia() && *k != SyntaxKind::NEWLINE)
    }

    /// Does the fence at the cursor (after optional indent) carry an info string?
    fn fence_has_info(&self) -> bool {
        self.tokens[self.pos..]
            .iter()
            .skip(1)
            .take_while(|t| t.kind != SyntaxKind::NEWLINE)
            .any(|t| t.kind == SyntaxKind::TEXT)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        let Some(token) = self.current() else {
            return;
        };
        let (kind, text) = (token.kind, token.text);
        if token.is_unterminated_comment() {
            self.start_node(SyntaxKind::COMMENT);
            self.builder.token(kind.into(), text);
            self.missing(SyntaxKind::STAR_SLASH);
            self.finish_node();
        } else {
            self.builder.token(kind.into(), text);
        }
        self.pos += 1;
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Skip whitespace and comments on the current line
    fn skip_ws(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.bump();
        }
    }

    /// Skip trivia and line breaks
    fn skip_blank(&mut self) {
        while self
            .current()
            .map(|t| t.kind.is_trivia() || t.kind == SyntaxKind::NEWLINE)
            .unwrap_or(false)
        {
            self.bump();
        }
    }

    fn bump_to_line_end(&mut self) {
        while !self.at_line_end() {
            self.bump();
        }
    }

    // =========================================================================
    // Recovery markers
    // =========================================================================

    /// Zero-width node standing in for an expected token
    fn missing(&mut self, expected: SyntaxKind) {
        self.start_node(SyntaxKind::MISSING);
        self.builder.token(expected.into(), "");
        self.finish_node();
    }

    fn error_token(&mut self) {
        self.start_node(SyntaxKind::ERROR);
        self.bump();
        self.finish_node();
    }

    fn error_until_comma(&mut self) {
        self.start_node(SyntaxKind::ERROR);
        while !self.at_line_end() && !self.at(SyntaxKind::COMMA) {
            self.bump();
        }
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// SourceFile = (Description | Module | OrphanRegion | ErrorLines)*
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);

        loop {
            self.skip_blank();
            let Some(kind) = self.current_kind() else {
                break;
            };
            let pos_before = self.pos;
            match kind {
                SyntaxKind::DESCRIPTION_KW => self.parse_description(),
                SyntaxKind::MODULE_KW => self.parse_declaration(SyntaxKind::MODULE),
                SyntaxKind::FEATURE_KW
                | SyntaxKind::REQUIREMENT_KW
                | SyntaxKind::CONSTRAINT_KW
                | SyntaxKind::DEPENDS_ON_KW => self.parse_orphan_region(),
                SyntaxKind::UNKNOWN_KW => {
                    self.start_node(SyntaxKind::ERROR);
                    self.bump_to_line_end();
                    self.finish_node();
                }
                _ => self.parse_stray_lines(),
            }
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error_token();
            }
        }

        self.finish_node();
    }

    /// Blocks that need a container, found at top level. The parser keeps
    /// their structure but wraps the whole run in one `ERROR` node, up to the
    /// next module.
    fn parse_orphan_region(&mut self) {
        self.start_node(SyntaxKind::ERROR);

        let mut first = true;
        loop {
            let Some(next) = self.peek_significant() else {
                break;
            };
            let known = matches!(
                next,
                SyntaxKind::FEATURE_KW
                    | SyntaxKind::REQUIREMENT_KW
                    | SyntaxKind::CONSTRAINT_KW
                    | SyntaxKind::DEPENDS_ON_KW
                    | SyntaxKind::DESCRIPTION_KW
            );
            if !known {
                break;
            }
            if !first {
                self.skip_blank();
            }
            first = false;
            match next {
                SyntaxKind::FEATURE_KW => self.parse_declaration(SyntaxKind::FEATURE),
                SyntaxKind::REQUIREMENT_KW => self.parse_declaration(SyntaxKind::REQUIREMENT),
                SyntaxKind::CONSTRAINT_KW => self.parse_declaration(SyntaxKind::CONSTRAINT),
                SyntaxKind::DEPENDS_ON_KW => self.parse_depends_on(),
                _ => self.parse_description(),
            }
        }

        self.finish_node();
    }

    /// Prose or code outside any block, up to the next keyword line
    fn parse_stray_lines(&mut self) {
        self.start_node(SyntaxKind::ERROR);
        loop {
            if self.at(SyntaxKind::CODE_FENCE) {
                self.parse_code_block();
            } else {
                self.bump_to_line_end();
            }
            match self.peek_significant() {
                Some(next) if !next.is_keyword() => self.skip_blank(),
                _ => break,
            }
        }
        self.finish_node();
    }

    /// Description = '@description' Prose? NEWLINE Body
    fn parse_description(&mut self) {
        self.start_node(SyntaxKind::DESCRIPTION_BLOCK);

        self.bump(); // @description
        self.skip_ws();
        if !self.at_line_end() {
            self.parse_prose_line();
        }
        self.parse_body(SyntaxKind::DESCRIPTION_BLOCK);

        self.finish_node();
    }

    /// Declaration = Keyword Name RestOfLine? NEWLINE Body
    fn parse_declaration(&mut self, kind: SyntaxKind) {
        self.start_node(kind);

        self.bump(); // keyword
        self.parse_header_name();
        self.parse_body(kind);

        self.finish_node();
    }

    /// Name after a declaration keyword, then anything left on the line
    fn parse_header_name(&mut self) {
        self.skip_ws();
        match self.current_kind() {
            Some(SyntaxKind::IDENT) => {
                self.start_node(SyntaxKind::NAME);
                self.bump();
                self.finish_node();
            }
            Some(SyntaxKind::NUMBER) => {
                // Identifier starting with a digit: keep the whole word together
                self.start_node(SyntaxKind::ERROR);
                while self
                    .current()
                    .map(|t| !t.kind.is_trivia() && t.kind != SyntaxKind::NEWLINE)
                    .unwrap_or(false)
                {
                    self.bump();
                }
                self.finish_node();
            }
            _ => self.missing(SyntaxKind::IDENT),
        }

        self.skip_ws();
        if !self.at_line_end() {
            self.start_node(SyntaxKind::ERROR);
            self.bump_to_line_end();
            self.finish_node();
        }
    }

    /// Body = (Declaration | DependsOn | CodeBlock | Prose)*, ending at a
    /// keyword whose block rank is not nested below the owner
    fn parse_body(&mut self, owner: SyntaxKind) {
        let rank = match owner {
            SyntaxKind::FEATURE => 1,
            SyntaxKind::REQUIREMENT => 2,
            SyntaxKind::CONSTRAINT => 3,
            _ => 0,
        };

        loop {
            let Some(next) = self.peek_significant() else {
                break;
            };
            let ends = match next.block_rank() {
                Some(next_rank) => next_rank <= rank || owner == SyntaxKind::DESCRIPTION_BLOCK,
                None => next == SyntaxKind::DEPENDS_ON_KW && owner == SyntaxKind::DESCRIPTION_BLOCK,
            };
            if ends {
                break;
            }

            self.skip_blank();
            let pos_before = self.pos;
            match next {
                SyntaxKind::FEATURE_KW => self.parse_declaration(SyntaxKind::FEATURE),
                SyntaxKind::REQUIREMENT_KW => self.parse_declaration(SyntaxKind::REQUIREMENT),
                SyntaxKind::CONSTRAINT_KW => self.parse_declaration(SyntaxKind::CONSTRAINT),
                SyntaxKind::DEPENDS_ON_KW if owner == SyntaxKind::CONSTRAINT => {
                    self.start_node(SyntaxKind::ERROR);
                    self.parse_depends_on();
                    self.finish_node();
                }
                SyntaxKind::DEPENDS_ON_KW => self.parse_depends_on(),
                SyntaxKind::UNKNOWN_KW => {
                    self.start_node(SyntaxKind::ERROR);
                    self.bump_to_line_end();
                    self.finish_node();
                }
                SyntaxKind::CODE_FENCE => self.parse_code_block(),
                _ => self.parse_prose_line(),
            }
            if self.pos == pos_before && !self.at_eof() {
                self.error_token();
            }
        }
    }

    /// Prose = token* up to the line break
    fn parse_prose_line(&mut self) {
        self.start_node(SyntaxKind::PROSE);
        self.bump_to_line_end();
        self.finish_node();
    }

    /// CodeBlock = '```' Info? NEWLINE CODE_TEXT* '```'
    fn parse_code_block(&mut self) {
        self.start_node(SyntaxKind::CODE_BLOCK);

        self.bump(); // opening fence
        self.bump_to_line_end();
        self.eat(SyntaxKind::NEWLINE);

        loop {
            if self.at_eof() {
                self.missing(SyntaxKind::CODE_FENCE);
                break;
            }
            let indented_fence =
                self.at(SyntaxKind::WHITESPACE) && self.nth_raw(1) == Some(SyntaxKind::CODE_FENCE);
            if !indented_fence && !self.at(SyntaxKind::CODE_FENCE) {
                self.bump();
                continue;
            }
            self.eat(SyntaxKind::WHITESPACE);
            if self.fence_has_info() {
                // An opening fence inside an open block
                self.start_node(SyntaxKind::ERROR);
                self.bump_to_line_end();
                self.finish_node();
                continue;
            }
            self.bump(); // closing fence
            while self.at(SyntaxKind::WHITESPACE) {
                self.bump();
            }
            break;
        }

        self.finish_node();
    }

    /// DependsOn = '@depends-on' Reference (',' Reference)*
    fn parse_depends_on(&mut self) {
        self.start_node(SyntaxKind::DEPENDS_ON);

        self.bump(); // @depends-on
        self.skip_ws();
        if self.at_line_end() {
            self.missing(SyntaxKind::REFERENCE);
            self.finish_node();
            return;
        }

        loop {
            self.skip_ws();
            if self.at(SyntaxKind::IDENT) || self.at(SyntaxKind::DOT) {
                self.parse_reference();
            } else if self.at(SyntaxKind::COMMA) {
                self.missing(SyntaxKind::REFERENCE);
            } else {
                self.error_until_comma();
            }

            self.skip_ws();
            if !self.at(SyntaxKind::COMMA) && !self.at_line_end() {
                // Another target without a separating comma
                self.error_until_comma();
            }

            if self.eat(SyntaxKind::COMMA) {
                self.skip_ws();
                if self.at_line_end() {
                    self.missing(SyntaxKind::REFERENCE);
                    break;
                }
                continue;
            }
            break;
        }

        self.finish_node();
    }

    /// Reference = IDENT ('.' IDENT)*
    fn parse_reference(&mut self) {
        self.start_node(SyntaxKind::REFERENCE);

        let mut expect_ident = true;
        loop {
            match self.current_kind() {
                Some(SyntaxKind::IDENT) if expect_ident => {
                    self.bump();
                    expect_ident = false;
                }
                Some(SyntaxKind::DOT) if expect_ident => {
                    // Leading or doubled separator
                    self.error_token();
                }
                Some(SyntaxKind::DOT) => match self.nth_raw(1) {
                    Some(SyntaxKind::IDENT) | Some(SyntaxKind::DOT) => {
                        self.bump();
                        expect_ident = true;
                    }
                    _ => {
                        // Trailing separator
                        self.error_token();
                        break;
                    }
                },
                _ => break,
            }
        }

        self.finish_node();
    }
}
