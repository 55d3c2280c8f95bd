//! Rule surface for token-pair formatting.
//!
//! The engine resolves one rule per adjacent pair of lexical units and
//! applies its separator action. What the rule table contains, and how a
//! provider arbitrates between competing candidates, is the host's business:
//! this crate consumes a single `Option<Rule>` per lookup and takes it at
//! face value.

use bitflags::bitflags;
use riva_syntax::{ElementId, Span, SyntaxKind};
use rustc_hash::FxHashMap;

/// What triggered a formatting request.
///
/// Forwarded into every [`PairContext`] so rule tables may branch on the
/// trigger (e.g. be more conservative on paste).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Explicit selection formatting.
    Selection,
    /// Whole-document formatting.
    Document,
    /// Formatting of a pasted region.
    Paste,
    /// Format-on-type after a statement-terminating `;`.
    Semicolon,
    /// Format-on-type after a closing `}`.
    ClosingBrace,
    /// Reflow after a line break.
    Enter,
}

/// Separator action a rule demands between two lexical units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleAction {
    /// Leave the separator untouched.
    Ignore,
    /// Collapse the separator to nothing.
    Delete,
    /// Normalize the separator to exactly one space.
    Space,
    /// Normalize the separator to exactly one line terminator.
    NewLine,
}

bitflags! {
    /// Modifiers on a rule's action.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct RuleFlags: u8 {
        /// The action may collapse existing line breaks between the pair.
        /// Without it, `Space` and `NewLine` leave pairs that already sit
        /// on separate lines alone.
        const CAN_DELETE_NEWLINES = 1 << 0;
    }
}

/// A resolved formatting rule: an action plus its modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    pub action: RuleAction,
    pub flags: RuleFlags,
}

impl Rule {
    /// Rule with the given action and no flags.
    #[inline]
    pub const fn new(action: RuleAction) -> Self {
        Rule {
            action,
            flags: RuleFlags::empty(),
        }
    }

    /// Add flags to a rule.
    #[inline]
    #[must_use]
    pub const fn with_flags(mut self, flags: RuleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Check if this rule may collapse line breaks.
    #[inline]
    pub fn can_delete_newlines(&self) -> bool {
        self.flags.contains(RuleFlags::CAN_DELETE_NEWLINES)
    }
}

/// One lexical occurrence: a token or comment span tagged with its kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenRun {
    pub kind: SyntaxKind,
    pub span: Span,
}

impl TokenRun {
    /// Create a token run.
    #[inline]
    pub const fn new(kind: SyntaxKind, span: Span) -> Self {
        TokenRun { kind, span }
    }
}

/// Context for one adjacent pair, handed to the rule provider.
///
/// A single instance lives per formatting pass and is fully overwritten
/// before each lookup; providers must not retain it across calls.
#[derive(Clone, Copy, Debug)]
pub struct PairContext {
    /// Trigger of the enclosing request.
    pub request: RequestKind,
    /// The earlier lexical unit.
    pub token_before: TokenRun,
    /// The later lexical unit.
    pub token_after: TokenRun,
    /// Node enclosing the earlier unit.
    pub before_parent: ElementId,
    /// Node enclosing the later unit.
    pub after_parent: ElementId,
    /// Kind of the node enclosing the earlier unit.
    pub before_parent_kind: SyntaxKind,
    /// Kind of the node enclosing the later unit.
    pub after_parent_kind: SyntaxKind,
    /// Lowest common ancestor of the pair.
    pub common_ancestor: ElementId,
    /// Kind of the lowest common ancestor.
    pub common_ancestor_kind: SyntaxKind,
    /// Whether both units start on the same physical line.
    pub tokens_on_same_line: bool,
}

/// Opaque rule lookup.
///
/// `None` means the pair carries no separator constraint; the engine then
/// only performs its independent trailing-whitespace trimming.
pub trait RuleProvider {
    fn lookup(&self, context: &PairContext) -> Option<Rule>;
}

impl<P: RuleProvider + ?Sized> RuleProvider for &P {
    fn lookup(&self, context: &PairContext) -> Option<Rule> {
        (**self).lookup(context)
    }
}

/// Simple kind-pair rule table.
///
/// A building block for hosts assembling rule tables keyed on the kinds of
/// the two units. Insertion is last-wins; any richer matching or priority
/// scheme belongs in the host's own [`RuleProvider`].
#[derive(Debug, Default)]
pub struct PairRuleSet {
    rules: FxHashMap<(SyntaxKind, SyntaxKind), Rule>,
}

impl PairRuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        PairRuleSet::default()
    }

    /// Map the pair `(left, right)` to a rule, replacing any previous entry.
    pub fn insert(&mut self, left: SyntaxKind, right: SyntaxKind, rule: Rule) -> &mut Self {
        self.rules.insert((left, right), rule);
        self
    }

    /// Number of pairs with an entry.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RuleProvider for PairRuleSet {
    fn lookup(&self, context: &PairContext) -> Option<Rule> {
        self.rules
            .get(&(context.token_before.kind, context.token_after.kind))
            .copied()
    }
}
