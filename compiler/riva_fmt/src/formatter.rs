//! Token-pair formatting walk.
//!
//! [`TokenPairFormatter`] visits tokens and comment trivia inside a target
//! span in document order, carries the enclosing-node context forward, and
//! for each adjacent pair resolves a rule and records the edits it demands.
//! Independently of rules it trims trailing whitespace on the physical
//! lines it passes over, so the formatter never leaves stray blanks behind.
//!
//! Malformed regions are left verbatim: skipped trivia advances the
//! previous-unit cursor without being formatted, and no pair inside the
//! subtree of a node with a skipped-or-missing token child produces edits.

use riva_syntax::{Span, SyntaxTree, TextSnapshot, Trivia};
use tracing::trace;

use crate::ancestry::{AncestryArena, AncestryId};
use crate::edits::{EditRecorder, TextEdit};
use crate::options::FormatOptions;
use crate::rules::{PairContext, RequestKind, Rule, RuleAction, RuleProvider, TokenRun};
use crate::FormatError;

/// Indentation advice for one visited token, handed to the host's
/// indentation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndentHint {
    /// Indent (or not) as the indentation pass sees fit.
    Normal,
    /// Do not indent: a rule pulled this token onto the previous line.
    Skip,
    /// Indent anchored to a line break just inserted within the current
    /// line's context.
    SameLineAnchor,
}

/// Receiver for per-token indentation advice.
///
/// Invoked once for every token processed inside the target span. Hosts
/// without an indentation pass can pass `&mut ()`.
pub trait IndentSink {
    fn token_indent(&mut self, position: u32, hint: IndentHint);
}

impl IndentSink for () {
    fn token_indent(&mut self, _position: u32, _hint: IndentHint) {}
}

/// One formatting pass over a target span.
///
/// Construct per request, consume with [`TokenPairFormatter::into_edits`].
/// All pass-local state (ancestry arena, pair context, previous-unit
/// cursor) lives and dies with this value.
pub struct TokenPairFormatter<'a, R: RuleProvider, S: IndentSink> {
    tree: &'a SyntaxTree,
    snapshot: &'a TextSnapshot<'a>,
    target: Span,
    options: FormatOptions,
    request: RequestKind,
    rules: &'a R,
    sink: &'a mut S,
    recorder: EditRecorder,
    ancestry: AncestryArena,
    /// Last processed lexical unit (token or comment) and the context of
    /// its enclosing node.
    previous: Option<(TokenRun, AncestryId)>,
    /// Single live pair context, overwritten before every rule lookup.
    context: Option<PairContext>,
    /// Number of enclosing nodes flagged with a skipped-or-missing child.
    error_depth: u32,
}

impl<'a, R: RuleProvider, S: IndentSink> TokenPairFormatter<'a, R, S> {
    /// Create a pass over `target`. The span is taken as given; entry
    /// points snap it to a line start before constructing the pass.
    pub fn new(
        tree: &'a SyntaxTree,
        snapshot: &'a TextSnapshot<'a>,
        target: Span,
        options: FormatOptions,
        request: RequestKind,
        rules: &'a R,
        sink: &'a mut S,
    ) -> Self {
        TokenPairFormatter {
            tree,
            snapshot,
            target,
            options,
            request,
            rules,
            sink,
            recorder: EditRecorder::new(),
            ancestry: AncestryArena::new(),
            previous: None,
            context: None,
            error_depth: 0,
        }
    }

    /// Run the walk and return the accumulated edits.
    pub fn into_edits(mut self) -> Result<Vec<TextEdit>, FormatError> {
        let root = self.tree.root();
        let root_context = self.ancestry.alloc(root, None);
        if self.tree.has_skipped_or_missing_child(root) {
            self.error_depth += 1;
        }
        self.walk_node(root, root_context)?;
        Ok(self.recorder.into_edits())
    }

    fn walk_node(&mut self, node: riva_syntax::ElementId, context: AncestryId) -> Result<(), FormatError> {
        let tree = self.tree;
        for &child in tree.children(node) {
            // Subtrees that do not reach into the target span contribute
            // neither pairs nor a previous-unit cursor.
            if !tree.full_span(child).intersects(self.target) {
                continue;
            }
            if tree.is_node(child) {
                let flagged = tree.has_skipped_or_missing_child(child);
                if flagged {
                    self.error_depth += 1;
                }
                let child_context = self.ancestry.alloc(child, Some(context));
                self.walk_node(child, child_context)?;
                if flagged {
                    self.error_depth -= 1;
                }
            } else {
                self.process_token(child, context)?;
            }
        }
        Ok(())
    }

    /// Process one token: leading trivia, the token itself, trailing trivia.
    fn process_token(
        &mut self,
        token: riva_syntax::ElementId,
        context: AncestryId,
    ) -> Result<(), FormatError> {
        let tree = self.tree;
        let full = tree.full_span(token);
        if full.is_empty() {
            // Missing tokens occupy no text.
            return Ok(());
        }
        let span = tree.token_span(token);
        if !self.target.contains_span(span) {
            return Ok(());
        }

        self.process_trivia(tree.leading_trivia(token), full.start, context)?;

        let run = TokenRun::new(tree.kind(token), span);
        let mut hint = IndentHint::Normal;
        if self.error_depth == 0 {
            if let Some((previous, previous_context)) = self.previous {
                hint = self.format_pair(previous, previous_context, run, context)?;
            } else {
                // Trim from the start of the overall span up to the first
                // processed unit, even though there is no pair yet.
                let from = self.snapshot.line_index_of(self.target.start);
                let to = self.snapshot.line_index_of(run.span.start);
                self.trim_line_range(from, to, None);
            }
        }
        self.previous = Some((run, context));
        self.sink.token_indent(run.span.start, hint);

        self.process_trivia(tree.trailing_trivia(token), span.end, context)?;
        Ok(())
    }

    /// Process a trivia list. Comments are formatted like tokens; skipped
    /// text advances the cursor but is never formatted.
    fn process_trivia(
        &mut self,
        trivia: &[Trivia],
        full_start: u32,
        context: AncestryId,
    ) -> Result<(), FormatError> {
        let mut position = full_start;
        for piece in trivia {
            if piece.is_comment() || piece.is_skipped() {
                let span = Span::new(position, position + piece.len);
                if self.target.contains_span(span) {
                    let run = TokenRun::new(piece.kind, span);
                    if self.error_depth == 0 {
                        match self.previous {
                            Some((previous, previous_context)) if piece.is_comment() => {
                                self.format_pair(previous, previous_context, run, context)?;
                            }
                            _ => {
                                let from_position = self
                                    .previous
                                    .map_or(self.target.start, |(previous, _)| previous.span.start);
                                let from = self.snapshot.line_index_of(from_position);
                                let to = self.snapshot.line_index_of(run.span.start);
                                self.trim_line_range(from, to, None);
                            }
                        }
                    }
                    self.previous = Some((run, context));
                }
            }
            position += piece.len;
        }
        Ok(())
    }

    /// Format one adjacent pair and return the indentation advice for the
    /// later unit.
    fn format_pair(
        &mut self,
        before: TokenRun,
        before_context: AncestryId,
        after: TokenRun,
        after_context: AncestryId,
    ) -> Result<IndentHint, FormatError> {
        let line_before = self.snapshot.line_index_of(before.span.start);
        let line_after = self.snapshot.line_index_of(after.span.start);

        let common = self.ancestry.common_ancestor(before_context, after_context)?;

        let before_parent = self.ancestry.element(before_context);
        let after_parent = self.ancestry.element(after_context);
        let context = self.context.insert(PairContext {
            request: self.request,
            token_before: before,
            token_after: after,
            before_parent,
            after_parent,
            before_parent_kind: self.tree.kind(before_parent),
            after_parent_kind: self.tree.kind(after_parent),
            common_ancestor: common,
            common_ancestor_kind: self.tree.kind(common),
            tokens_on_same_line: line_before == line_after,
        });

        let rule = self.rules.lookup(context);

        let mut hint = IndentHint::Normal;
        if let Some(rule) = rule {
            trace!(
                action = ?rule.action,
                before = ?before.kind,
                after = ?after.kind,
                "rule applied"
            );
            self.record_rule_edits(rule, before, after, line_before, line_after);

            // The later unit was pulled up onto the earlier unit's line:
            // the indentation pass must leave it alone.
            if matches!(rule.action, RuleAction::Space | RuleAction::Delete)
                && line_before != line_after
            {
                hint = IndentHint::Skip;
            }

            // A break was just inserted within what used to be one line.
            if rule.action == RuleAction::NewLine && line_before == line_after {
                hint = IndentHint::SameLineAnchor;
            }
        }

        // If the units stay on different lines, clean up trailing blanks on
        // every line in between. Rules that collapse the gap handle the
        // whole between-span themselves.
        let keeps_line_breaks = rule.map_or(true, |rule| {
            rule.action != RuleAction::Delete && !rule.can_delete_newlines()
        });
        if line_before != line_after && keeps_line_breaks {
            self.trim_line_range(line_before, line_after, Some(before));
        }

        Ok(hint)
    }

    /// Record the edits a matched rule demands for the text between the
    /// pair.
    fn record_rule_edits(
        &mut self,
        rule: Rule,
        before: TokenRun,
        after: TokenRun,
        line_before: u32,
        line_after: u32,
    ) {
        let between = Span::new(before.span.end, after.span.start);
        let same_line = line_before == line_after;

        match rule.action {
            RuleAction::Ignore => {}

            RuleAction::Delete => {
                if !between.is_empty() {
                    self.recorder.record(between.start, between.len(), "");
                }
            }

            RuleAction::Space => {
                if !(rule.can_delete_newlines() || same_line) {
                    return;
                }
                if self.snapshot.slice(between) != " " {
                    self.recorder.record(between.start, between.len(), " ");
                }
            }

            RuleAction::NewLine => {
                if !(rule.can_delete_newlines() || same_line) {
                    return;
                }
                let text = self.snapshot.slice(between);
                let terminator = self.options.line_ending.as_str();
                let mut breaks = text.match_indices(terminator);
                // Exactly one terminator is already normalized; zero needs
                // an insertion, two or more collapse to one.
                let normalized = breaks.next().is_some() && breaks.next().is_none();
                if !normalized {
                    self.recorder
                        .record(between.start, between.len(), terminator);
                }
            }
        }
    }

    fn trim_line_range(&mut self, from_line: u32, to_line: u32, guard: Option<TokenRun>) {
        for line in from_line..to_line {
            self.trim_line(line, guard);
        }
    }

    /// Delete the trailing whitespace run of one physical line, unless the
    /// line end falls inside a comment.
    fn trim_line(&mut self, line: u32, guard: Option<TokenRun>) {
        let line_end = self.snapshot.line_end(line);
        if let Some(token) = guard {
            if token.kind.is_comment()
                && token.span.start <= line_end
                && token.span.end >= line_end
            {
                return;
            }
        }

        let text = self.snapshot.line_text(line);
        let trailing = text.bytes().rev().take_while(|&byte| is_blank(byte)).count() as u32;
        if trailing > 0 {
            let length = text.len() as u32;
            self.recorder
                .record(self.snapshot.line_start(line) + length - trailing, trailing, "");
        }
    }
}

/// Horizontal whitespace, as far as trailing-blank trimming is concerned.
/// Line terminators never appear in line text.
#[inline]
fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | 0x0B | 0x0C)
}
