//! Formatting entry points.
//!
//! One [`Formatter`] per (tree, snapshot, rules, options) answers the six
//! editing triggers, each computing the minimal document span to reformat
//! and delegating to the token-pair walk. Every span is snapped back to the
//! start of its containing physical line first: formatting always sees
//! full-line context, even for a sub-line request.

use riva_syntax::{Span, SyntaxKind, SyntaxTree, TextSnapshot};

use crate::edits::TextEdit;
use crate::formatter::{IndentSink, TokenPairFormatter};
use crate::options::FormatOptions;
use crate::rules::{RequestKind, RuleProvider};
use crate::FormatError;

/// Trigger router over one parsed document.
pub struct Formatter<'a, R: RuleProvider> {
    tree: &'a SyntaxTree,
    snapshot: &'a TextSnapshot<'a>,
    rules: &'a R,
    options: FormatOptions,
}

impl<'a, R: RuleProvider> Formatter<'a, R> {
    /// Create a formatter over a parsed document.
    pub fn new(
        tree: &'a SyntaxTree,
        snapshot: &'a TextSnapshot<'a>,
        rules: &'a R,
        options: FormatOptions,
    ) -> Self {
        Formatter {
            tree,
            snapshot,
            rules,
            options,
        }
    }

    /// Format an explicit selection.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn format_selection(&self, min: u32, lim: u32) -> Result<Vec<TextEdit>, FormatError> {
        self.format_span(Span::from_bounds(min, lim), RequestKind::Selection)
    }

    /// Format a document range (typically the whole document).
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn format_document(&self, min: u32, lim: u32) -> Result<Vec<TextEdit>, FormatError> {
        self.format_span(Span::from_bounds(min, lim), RequestKind::Document)
    }

    /// Format a pasted range. Mechanically a selection format; rule tables
    /// may branch on the trigger.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn format_on_paste(&self, min: u32, lim: u32) -> Result<Vec<TextEdit>, FormatError> {
        self.format_span(Span::from_bounds(min, lim), RequestKind::Paste)
    }

    /// Format the statement just terminated by a `;` typed at `caret`.
    ///
    /// Returns no edits when the token before the caret is not a semicolon.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn format_on_semicolon(&self, caret: u32) -> Result<Vec<TextEdit>, FormatError> {
        self.format_terminated_construct(caret, SyntaxKind::Semicolon, RequestKind::Semicolon)
    }

    /// Format the block construct just closed by a `}` typed at `caret`.
    ///
    /// Returns no edits when the token before the caret is not a closing
    /// brace.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn format_on_closing_brace(&self, caret: u32) -> Result<Vec<TextEdit>, FormatError> {
        self.format_terminated_construct(caret, SyntaxKind::CloseBrace, RequestKind::ClosingBrace)
    }

    /// Reflow after a line break: format the previous line together with
    /// the caret's line. Returns no edits on the first line.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn format_on_enter(&self, caret: u32) -> Result<Vec<TextEdit>, FormatError> {
        let line = self.snapshot.line_index_of(caret);
        if line == 0 {
            return Ok(Vec::new());
        }
        let span = Span::new(
            self.snapshot.line_start(line - 1),
            self.snapshot.line_end(line),
        );
        self.format_span(span, RequestKind::Enter)
    }

    /// Format a span, reporting indentation advice to the given sink.
    pub fn format_span_with<S: IndentSink>(
        &self,
        span: Span,
        request: RequestKind,
        sink: &mut S,
    ) -> Result<Vec<TextEdit>, FormatError> {
        // Always format from the beginning of the line.
        let line = self.snapshot.line_index_of(span.start);
        let span = Span::new(self.snapshot.line_start(line), span.end);

        TokenPairFormatter::new(
            self.tree,
            self.snapshot,
            span,
            self.options,
            request,
            self.rules,
            sink,
        )
        .into_edits()
    }

    fn format_span(&self, span: Span, request: RequestKind) -> Result<Vec<TextEdit>, FormatError> {
        self.format_span_with(span, request, &mut ())
    }

    /// Shared walk for the `;` and `}` triggers: find the token ending at
    /// the caret, then ascend to the outermost node this token terminates.
    fn format_terminated_construct(
        &self,
        caret: u32,
        terminator: SyntaxKind,
        request: RequestKind,
    ) -> Result<Vec<TextEdit>, FormatError> {
        if caret == 0 {
            return Ok(Vec::new());
        }
        let Some(token) = self.tree.token_at_offset(caret - 1) else {
            return Ok(Vec::new());
        };
        if self.tree.kind(token) != terminator {
            return Ok(Vec::new());
        }

        let end = self.tree.token_span(token).end;
        let mut current = token;
        while let Some(parent) = self.tree.parent(current) {
            // Generic list containers group many constructs; they are not
            // "the statement this token terminates".
            if self.tree.span(parent).end == end && !self.tree.kind(parent).is_list() {
                current = parent;
            } else {
                break;
            }
        }

        self.format_span(self.tree.full_span(current), request)
    }
}
