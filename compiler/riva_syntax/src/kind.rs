//! Lexical and syntactic kinds.
//!
//! One flat kind space covers tokens, trivia, and nodes, so a single
//! discriminant identifies any element of a [`crate::SyntaxTree`] and any
//! lexical occurrence the formatter walks over.

/// Kind of a token, trivia piece, or syntax node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    // Tokens
    /// Identifier: `foo`, `bar`
    Ident,
    /// Numeric literal: `42`, `3.14`
    Number,
    /// String literal: `"hello"`
    Str,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `let`
    LetKw,
    /// `return`
    ReturnKw,
    /// `if`
    IfKw,
    /// `else`
    ElseKw,
    /// `while`
    WhileKw,
    /// End-of-file marker token (zero width, may carry leading trivia).
    Eof,

    // Trivia
    /// Whitespace run, including line terminators.
    Whitespace,
    /// `// ...` up to the end of the line.
    LineComment,
    /// `/* ... */`, possibly spanning several lines.
    BlockComment,
    /// Text the parser skipped during error recovery. Preserved verbatim.
    SkippedText,

    // Nodes
    /// Root of a parsed file.
    SourceFile,
    /// Generic container for a run of statements.
    StatementList,
    /// Expression followed by `;`.
    ExprStatement,
    /// `let x = ... ;`
    LetStatement,
    /// `return ... ;`
    ReturnStatement,
    /// `if ( ... ) { ... }`
    IfStatement,
    /// `while ( ... ) { ... }`
    WhileStatement,
    /// `{ ... }`
    Block,
    /// A name used as an expression.
    NameRef,
    /// A literal used as an expression.
    Literal,
    /// `a + b`, `a = b`, ...
    BinaryExpr,
    /// `f(a, b)`
    CallExpr,
    /// Argument container of a call.
    ArgList,
    /// `( ... )`
    ParenExpr,
}

impl SyntaxKind {
    /// Check if this kind is trivia (whitespace, comments, skipped text).
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::LineComment
                | SyntaxKind::BlockComment
                | SyntaxKind::SkippedText
        )
    }

    /// Check if this kind is a comment.
    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, SyntaxKind::LineComment | SyntaxKind::BlockComment)
    }

    /// Check if this kind names a syntax node rather than a token or trivia.
    #[inline]
    pub fn is_node(self) -> bool {
        matches!(
            self,
            SyntaxKind::SourceFile
                | SyntaxKind::StatementList
                | SyntaxKind::ExprStatement
                | SyntaxKind::LetStatement
                | SyntaxKind::ReturnStatement
                | SyntaxKind::IfStatement
                | SyntaxKind::WhileStatement
                | SyntaxKind::Block
                | SyntaxKind::NameRef
                | SyntaxKind::Literal
                | SyntaxKind::BinaryExpr
                | SyntaxKind::CallExpr
                | SyntaxKind::ArgList
                | SyntaxKind::ParenExpr
        )
    }

    /// Check if this kind is a token.
    #[inline]
    pub fn is_token(self) -> bool {
        !self.is_trivia() && !self.is_node()
    }

    /// Check if this kind is a keyword token.
    #[inline]
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::LetKw
                | SyntaxKind::ReturnKw
                | SyntaxKind::IfKw
                | SyntaxKind::ElseKw
                | SyntaxKind::WhileKw
        )
    }

    /// Check if this kind is a generic list container node.
    ///
    /// List containers group arbitrarily many siblings and do not represent
    /// a single logical statement or expression.
    #[inline]
    pub fn is_list(self) -> bool {
        matches!(self, SyntaxKind::StatementList | SyntaxKind::ArgList)
    }
}
