//! Formatting options.
//!
//! The options quadruple every formatting request carries: tab/space
//! preference, widths, and the line terminator used when a rule inserts or
//! collapses line breaks. Indentation widths are not consumed here; they
//! ride along for the indentation pass the host runs after this engine.

/// Line terminator written by `NewLine` rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// The terminator as a string slice.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Configured style for one formatting request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    /// Indent with tabs instead of spaces.
    pub use_tabs: bool,

    /// Display width of a tab character.
    pub tab_size: usize,

    /// Spaces (or tab-equivalents) per indentation level.
    pub indent_size: usize,

    /// Line terminator for inserted line breaks.
    pub line_ending: LineEnding,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            use_tabs: false,
            tab_size: 4,
            indent_size: 4,
            line_ending: LineEnding::Lf,
        }
    }
}

impl FormatOptions {
    /// Create options with the specified line ending.
    pub fn with_line_ending(line_ending: LineEnding) -> Self {
        FormatOptions {
            line_ending,
            ..Default::default()
        }
    }
}
