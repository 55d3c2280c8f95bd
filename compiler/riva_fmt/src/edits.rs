//! Text edits and the edit recorder.
//!
//! Edits are the engine's only output: `(position, length, replacement)`
//! triples against the *original* snapshot, recorded in ascending document
//! order and never overlapping. The caller applies them; the engine never
//! mutates text.

use riva_syntax::Span;

/// One replacement against the original text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte offset in the original text.
    pub position: u32,
    /// Number of bytes replaced.
    pub length: u32,
    /// Replacement text (empty for a pure deletion).
    pub replacement: String,
}

impl TextEdit {
    /// Create an edit.
    pub fn new(position: u32, length: u32, replacement: impl Into<String>) -> Self {
        TextEdit {
            position,
            length,
            replacement: replacement.into(),
        }
    }

    /// The replaced range in the original text.
    pub fn span(&self) -> Span {
        Span::new(self.position, self.position + self.length)
    }
}

/// Accumulates edits in ascending, non-overlapping order.
#[derive(Debug, Default)]
pub struct EditRecorder {
    edits: Vec<TextEdit>,
    last_end: u32,
}

impl EditRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        EditRecorder::default()
    }

    /// Record one edit. Edits must arrive in document order and must not
    /// overlap a previously recorded edit.
    pub fn record(&mut self, position: u32, length: u32, replacement: &str) {
        debug_assert!(
            position >= self.last_end,
            "edit at {position} overlaps previous edit ending at {}",
            self.last_end
        );
        self.last_end = position + length;
        self.edits.push(TextEdit::new(position, length, replacement));
    }

    /// Number of edits recorded so far.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Take the recorded edits, ordered by position.
    pub fn into_edits(self) -> Vec<TextEdit> {
        self.edits
    }
}

/// Apply an ordered, non-overlapping edit list to the original text.
///
/// Edits are applied back to front so earlier byte offsets stay valid while
/// later regions are replaced.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
    let mut result = source.to_string();
    for edit in edits.iter().rev() {
        let start = edit.position as usize;
        let end = (edit.position + edit.length) as usize;
        result.replace_range(start..end, &edit.replacement);
    }
    result
}
