//! Riva Formatter
//!
//! Rule-driven whitespace and line-break normalization for the Riva
//! language services. Given a parsed syntax tree, a text snapshot, a
//! configured style, and a host-supplied rule table, the engine produces a
//! minimal ordered list of text edits. It never rewrites token text and
//! never touches syntactically malformed regions.
//!
//! # Architecture
//!
//! A request flows through three stages:
//!
//! 1. A trigger entry point ([`Formatter`]) computes the document span to
//!    reformat (selection, whole document, paste, or the construct behind a
//!    typed `;`, `}`, or line break) and snaps it to a line start.
//! 2. [`TokenPairFormatter`] walks tokens and comments inside that span in
//!    document order, resolves a [`Rule`] per adjacent pair via the opaque
//!    [`RuleProvider`], applies it, and trims stray trailing whitespace.
//! 3. The accumulated [`TextEdit`]s are returned for the caller to apply
//!    against the original text.
//!
//! Indentation widths are deliberately out of scope: the walk only emits
//! per-token [`IndentHint`]s to an injected [`IndentSink`] for the host's
//! indentation pass.
//!
//! # Modules
//!
//! - [`options`]: style configuration carried by each request
//! - [`edits`]: text edits, the recorder, and edit application
//! - [`rules`]: rule actions/flags, pair context, provider trait
//! - [`ancestry`]: pass-local ancestry arena and common-ancestor search
//! - [`formatter`]: the token-pair walk
//! - [`triggers`]: the six formatting entry points

pub mod ancestry;
pub mod edits;
pub mod formatter;
pub mod options;
pub mod rules;
pub mod triggers;

pub use ancestry::{AncestryArena, AncestryId};
pub use edits::{apply_edits, EditRecorder, TextEdit};
pub use formatter::{IndentHint, IndentSink, TokenPairFormatter};
pub use options::{FormatOptions, LineEnding};
pub use rules::{
    PairContext, PairRuleSet, RequestKind, Rule, RuleAction, RuleFlags, RuleProvider, TokenRun,
};
pub use triggers::Formatter;

/// Internal invariant violations. These signal a bug in the engine or its
/// inputs, never a property of the source text being formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Two tokens of one document did not share an ancestor. Every ancestry
    /// chain of a valid tree converges on the document root.
    #[error("token pair has no common ancestor; ancestry chains do not share a root")]
    NoCommonAncestor,
}
