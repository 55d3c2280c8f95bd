//! Shared test harness: a miniature lexer and parser producing
//! `riva_syntax` trees from source text.
//!
//! The production parser is a separate concern; the formatter only consumes
//! its output. This harness covers just enough of a statement language
//! (assignments, `let`/`return`, `if`/`while`, blocks, calls, comments) to
//! exercise the engine end to end. Unknown characters become skipped
//! trivia, and absent expected tokens become missing tokens, so malformed
//! inputs flag their enclosing nodes exactly like real error recovery.

#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use riva_syntax::{SyntaxKind, SyntaxTree, TreeBuilder, Trivia};

/// A lexed token with the trivia run preceding it.
#[derive(Debug)]
struct Token {
    kind: SyntaxKind,
    len: u32,
    leading: Vec<Trivia>,
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

fn keyword(text: &str) -> Option<SyntaxKind> {
    match text {
        "let" => Some(SyntaxKind::LetKw),
        "return" => Some(SyntaxKind::ReturnKw),
        "if" => Some(SyntaxKind::IfKw),
        "else" => Some(SyntaxKind::ElseKw),
        "while" => Some(SyntaxKind::WhileKw),
        _ => None,
    }
}

/// Lex the source into raw pieces (tokens and trivia) in document order.
fn lex_raw(source: &str) -> Vec<(SyntaxKind, u32)> {
    let bytes = source.as_bytes();
    let mut pieces = Vec::new();
    let mut pos = 0usize;

    while pos < bytes.len() {
        let start = pos;
        let kind = match bytes[pos] {
            b' ' | b'\t' | b'\r' | b'\n' => {
                while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t' | b'\r' | b'\n') {
                    pos += 1;
                }
                SyntaxKind::Whitespace
            }
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1;
                }
                SyntaxKind::LineComment
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                pos += 2;
                while pos < bytes.len() {
                    if bytes[pos] == b'*' && bytes.get(pos + 1) == Some(&b'/') {
                        pos += 2;
                        break;
                    }
                    pos += 1;
                }
                SyntaxKind::BlockComment
            }
            c if is_ident_start(c) => {
                while pos < bytes.len() && is_ident_continue(bytes[pos]) {
                    pos += 1;
                }
                keyword(&source[start..pos]).unwrap_or(SyntaxKind::Ident)
            }
            c if c.is_ascii_digit() => {
                while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
                    pos += 1;
                }
                SyntaxKind::Number
            }
            b'"' => {
                pos += 1;
                while pos < bytes.len() && bytes[pos] != b'"' {
                    pos += 1;
                }
                pos = (pos + 1).min(bytes.len());
                SyntaxKind::Str
            }
            b'=' if bytes.get(pos + 1) == Some(&b'=') => {
                pos += 2;
                SyntaxKind::EqEq
            }
            b'=' => {
                pos += 1;
                SyntaxKind::Eq
            }
            b';' => {
                pos += 1;
                SyntaxKind::Semicolon
            }
            b',' => {
                pos += 1;
                SyntaxKind::Comma
            }
            b'(' => {
                pos += 1;
                SyntaxKind::OpenParen
            }
            b')' => {
                pos += 1;
                SyntaxKind::CloseParen
            }
            b'{' => {
                pos += 1;
                SyntaxKind::OpenBrace
            }
            b'}' => {
                pos += 1;
                SyntaxKind::CloseBrace
            }
            b'+' => {
                pos += 1;
                SyntaxKind::Plus
            }
            b'-' => {
                pos += 1;
                SyntaxKind::Minus
            }
            b'*' => {
                pos += 1;
                SyntaxKind::Star
            }
            b'/' => {
                pos += 1;
                SyntaxKind::Slash
            }
            b'<' => {
                pos += 1;
                SyntaxKind::Lt
            }
            b'>' => {
                pos += 1;
                SyntaxKind::Gt
            }
            _ => {
                // Unknown characters become one skipped-text run.
                while pos < bytes.len() && !known_start(bytes[pos]) {
                    pos += 1;
                }
                SyntaxKind::SkippedText
            }
        };
        pieces.push((kind, (pos - start) as u32));
    }

    pieces
}

fn known_start(c: u8) -> bool {
    matches!(
        c,
        b' ' | b'\t' | b'\r' | b'\n' | b'"' | b'=' | b';' | b',' | b'(' | b')' | b'{' | b'}'
            | b'+' | b'-' | b'*' | b'/' | b'<' | b'>'
    ) || is_ident_start(c)
        || c.is_ascii_digit()
}

/// Group raw pieces into tokens with leading trivia. The trailing run of
/// trivia at end of file leads the zero-width `Eof` token.
fn tokens(source: &str) -> Vec<Token> {
    let mut result = Vec::new();
    let mut pending: Vec<Trivia> = Vec::new();

    for (kind, len) in lex_raw(source) {
        if kind.is_trivia() {
            pending.push(Trivia::new(kind, len));
        } else {
            result.push(Token {
                kind,
                len,
                leading: std::mem::take(&mut pending),
            });
        }
    }
    result.push(Token {
        kind: SyntaxKind::Eof,
        len: 0,
        leading: pending,
    });
    result
}

/// Non-trivia token kinds and texts, for token-preservation checks.
pub fn lex_tokens(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut result = Vec::new();
    let mut pos = 0usize;
    for (kind, len) in lex_raw(source) {
        let end = pos + len as usize;
        if !kind.is_trivia() {
            result.push((kind, source[pos..end].to_string()));
        }
        pos = end;
    }
    result
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    builder: TreeBuilder,
}

impl Parser {
    fn peek(&self) -> SyntaxKind {
        self.tokens[self.pos].kind
    }

    fn peek_next(&self) -> SyntaxKind {
        self.tokens
            .get(self.pos + 1)
            .map_or(SyntaxKind::Eof, |t| t.kind)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.peek() == kind
    }

    fn bump(&mut self) {
        let token = &mut self.tokens[self.pos];
        let leading = std::mem::take(&mut token.leading);
        self.builder
            .token_with_trivia(token.kind, token.len, leading, Vec::new());
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: SyntaxKind) {
        if self.at(kind) {
            self.bump();
        } else {
            self.builder.missing_token(kind);
        }
    }

    fn parse_source_file(&mut self) {
        self.builder.start_node(SyntaxKind::SourceFile);
        self.builder.start_node(SyntaxKind::StatementList);
        while !self.at(SyntaxKind::Eof) {
            let before = self.pos;
            self.parse_statement();
            if self.pos == before {
                // Stray token no statement claimed (e.g. an unmatched `}`).
                self.bump();
            }
        }
        self.builder.finish_node();
        self.bump(); // Eof
        self.builder.finish_node();
    }

    fn parse_statement(&mut self) {
        match self.peek() {
            SyntaxKind::OpenBrace => self.parse_block(),
            SyntaxKind::LetKw => {
                self.builder.start_node(SyntaxKind::LetStatement);
                self.bump();
                self.expect(SyntaxKind::Ident);
                self.expect(SyntaxKind::Eq);
                self.parse_expr();
                self.expect(SyntaxKind::Semicolon);
                self.builder.finish_node();
            }
            SyntaxKind::ReturnKw => {
                self.builder.start_node(SyntaxKind::ReturnStatement);
                self.bump();
                if !self.at(SyntaxKind::Semicolon) {
                    self.parse_expr();
                }
                self.expect(SyntaxKind::Semicolon);
                self.builder.finish_node();
            }
            SyntaxKind::IfKw => {
                self.builder.start_node(SyntaxKind::IfStatement);
                self.bump();
                self.expect(SyntaxKind::OpenParen);
                self.parse_expr();
                self.expect(SyntaxKind::CloseParen);
                self.parse_block();
                if self.at(SyntaxKind::ElseKw) {
                    self.bump();
                    self.parse_block();
                }
                self.builder.finish_node();
            }
            SyntaxKind::WhileKw => {
                self.builder.start_node(SyntaxKind::WhileStatement);
                self.bump();
                self.expect(SyntaxKind::OpenParen);
                self.parse_expr();
                self.expect(SyntaxKind::CloseParen);
                self.parse_block();
                self.builder.finish_node();
            }
            kind if is_expr_start(kind) => {
                self.builder.start_node(SyntaxKind::ExprStatement);
                self.parse_expr();
                self.expect(SyntaxKind::Semicolon);
                self.builder.finish_node();
            }
            _ => {}
        }
    }

    fn parse_block(&mut self) {
        self.builder.start_node(SyntaxKind::Block);
        self.expect(SyntaxKind::OpenBrace);
        while !self.at(SyntaxKind::CloseBrace) && !self.at(SyntaxKind::Eof) {
            let before = self.pos;
            self.parse_statement();
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(SyntaxKind::CloseBrace);
        self.builder.finish_node();
    }

    fn parse_expr(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.parse_operand();
        let mut wrapped = false;
        while is_binary_op(self.peek()) {
            if !wrapped {
                self.builder.start_node_at(checkpoint, SyntaxKind::BinaryExpr);
                wrapped = true;
            }
            self.bump();
            self.parse_operand();
        }
        if wrapped {
            self.builder.finish_node();
        }
    }

    fn parse_operand(&mut self) {
        match self.peek() {
            SyntaxKind::Number | SyntaxKind::Str => {
                self.builder.start_node(SyntaxKind::Literal);
                self.bump();
                self.builder.finish_node();
            }
            SyntaxKind::Ident if self.peek_next() == SyntaxKind::OpenParen => {
                self.builder.start_node(SyntaxKind::CallExpr);
                self.bump();
                self.builder.start_node(SyntaxKind::ArgList);
                self.bump(); // '('
                if !self.at(SyntaxKind::CloseParen) && !self.at(SyntaxKind::Eof) {
                    self.parse_expr();
                    while self.at(SyntaxKind::Comma) {
                        self.bump();
                        self.parse_expr();
                    }
                }
                self.expect(SyntaxKind::CloseParen);
                self.builder.finish_node();
                self.builder.finish_node();
            }
            SyntaxKind::Ident => {
                self.builder.start_node(SyntaxKind::NameRef);
                self.bump();
                self.builder.finish_node();
            }
            SyntaxKind::OpenParen => {
                self.builder.start_node(SyntaxKind::ParenExpr);
                self.bump();
                self.parse_expr();
                self.expect(SyntaxKind::CloseParen);
                self.builder.finish_node();
            }
            _ => {
                // The expression the grammar expected is absent.
                self.builder.start_node(SyntaxKind::NameRef);
                self.builder.missing_token(SyntaxKind::Ident);
                self.builder.finish_node();
            }
        }
    }
}

fn is_binary_op(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Eq
            | SyntaxKind::EqEq
            | SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Star
            | SyntaxKind::Slash
            | SyntaxKind::Lt
            | SyntaxKind::Gt
    )
}

fn is_expr_start(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Ident | SyntaxKind::Number | SyntaxKind::Str | SyntaxKind::OpenParen
    )
}

/// Parse source text into a syntax tree.
pub fn parse(source: &str) -> SyntaxTree {
    let mut parser = Parser {
        tokens: tokens(source),
        pos: 0,
        builder: TreeBuilder::new(),
    };
    parser.parse_source_file();
    parser.builder.finish()
}

/// Baseline rule table shared by tests: single spaces around assignment
/// and binary operators, none elsewhere.
pub fn assignment_rules() -> riva_fmt::PairRuleSet {
    use riva_fmt::{Rule, RuleAction};

    let mut rules = riva_fmt::PairRuleSet::new();
    for left in [SyntaxKind::Ident, SyntaxKind::Number, SyntaxKind::CloseParen] {
        for op in [SyntaxKind::Eq, SyntaxKind::EqEq, SyntaxKind::Plus, SyntaxKind::Lt] {
            rules.insert(left, op, Rule::new(RuleAction::Space));
            rules.insert(op, left, Rule::new(RuleAction::Space));
        }
    }
    for op in [SyntaxKind::Eq, SyntaxKind::EqEq, SyntaxKind::Plus, SyntaxKind::Lt] {
        rules.insert(op, SyntaxKind::Number, Rule::new(RuleAction::Space));
        rules.insert(op, SyntaxKind::Ident, Rule::new(RuleAction::Space));
        rules.insert(SyntaxKind::Number, op, Rule::new(RuleAction::Space));
        rules.insert(SyntaxKind::Ident, op, Rule::new(RuleAction::Space));
    }
    rules
}
