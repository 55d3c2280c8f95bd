//! Riva syntax surface
//!
//! The concrete types the language services consume from a parse: spans,
//! kinds, the arena syntax tree with attached trivia, and the line-indexed
//! text snapshot. The parser that produces trees lives elsewhere; this crate
//! only defines the shape of its output and a [`TreeBuilder`] for
//! constructing it.
//!
//! # Modules
//!
//! - [`span`]: compact byte spans over the source text
//! - [`kind`]: the flat token/trivia/node kind space
//! - [`tree`]: the arena tree, trivia, and builder
//! - [`snapshot`]: line-indexed immutable text view

pub mod kind;
pub mod snapshot;
pub mod span;
pub mod tree;

pub use kind::SyntaxKind;
pub use snapshot::TextSnapshot;
pub use span::Span;
pub use tree::{Checkpoint, ElementId, SyntaxTree, TreeBuilder, Trivia};
