//! Arena-based syntax tree.
//!
//! Every node and token lives in one flat arena; [`ElementId`] is a stable
//! index into it and doubles as node identity for consumers that compare
//! ancestors (the formatter's common-ancestor search keys on it).
//!
//! Tokens carry their trivia: leading and trailing lists of
//! [`Trivia`] pieces. Offsets are absolute byte positions in the original
//! source, computed once by [`TreeBuilder`]; the tree never re-derives them.

use crate::kind::SyntaxKind;
use crate::span::Span;

/// Stable identity of one element (node or token) in a [`SyntaxTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One piece of trivia attached to a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trivia {
    pub kind: SyntaxKind,
    pub len: u32,
}

impl Trivia {
    /// Create a trivia piece. `kind` must be a trivia kind.
    #[inline]
    pub fn new(kind: SyntaxKind, len: u32) -> Self {
        debug_assert!(kind.is_trivia(), "{kind:?} is not trivia");
        Trivia { kind, len }
    }

    /// Whitespace run of the given byte length.
    #[inline]
    pub fn whitespace(len: u32) -> Self {
        Trivia::new(SyntaxKind::Whitespace, len)
    }

    /// Line comment of the given byte length.
    #[inline]
    pub fn line_comment(len: u32) -> Self {
        Trivia::new(SyntaxKind::LineComment, len)
    }

    /// Block comment of the given byte length.
    #[inline]
    pub fn block_comment(len: u32) -> Self {
        Trivia::new(SyntaxKind::BlockComment, len)
    }

    /// Skipped (error recovery) text of the given byte length.
    #[inline]
    pub fn skipped(len: u32) -> Self {
        Trivia::new(SyntaxKind::SkippedText, len)
    }

    /// Check if this piece is a comment.
    #[inline]
    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }

    /// Check if this piece is skipped text.
    #[inline]
    pub fn is_skipped(&self) -> bool {
        self.kind == SyntaxKind::SkippedText
    }
}

#[derive(Debug)]
struct Element {
    kind: SyntaxKind,
    parent: Option<ElementId>,
    full_start: u32,
    full_len: u32,
    data: ElementData,
}

#[derive(Debug)]
enum ElementData {
    Node {
        children: Vec<ElementId>,
        /// True when a direct token child is missing or carries skipped trivia.
        error_child: bool,
    },
    Token {
        text_len: u32,
        missing: bool,
        leading: Vec<Trivia>,
        trailing: Vec<Trivia>,
    },
}

static NO_CHILDREN: [ElementId; 0] = [];
static NO_TRIVIA: [Trivia; 0] = [];

/// Immutable parsed syntax tree over one source text.
#[derive(Debug)]
pub struct SyntaxTree {
    elements: Vec<Element>,
}

impl SyntaxTree {
    /// Root element of the tree.
    #[inline]
    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    #[inline]
    fn get(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    /// Kind of an element.
    #[inline]
    pub fn kind(&self, id: ElementId) -> SyntaxKind {
        self.get(id).kind
    }

    /// Parent of an element, `None` for the root.
    #[inline]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).parent
    }

    /// Children of a node, in source order. Empty for tokens.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        match &self.get(id).data {
            ElementData::Node { children, .. } => children,
            ElementData::Token { .. } => &NO_CHILDREN,
        }
    }

    /// Check if an element is a token.
    #[inline]
    pub fn is_token(&self, id: ElementId) -> bool {
        matches!(self.get(id).data, ElementData::Token { .. })
    }

    /// Check if an element is a node.
    #[inline]
    pub fn is_node(&self, id: ElementId) -> bool {
        !self.is_token(id)
    }

    /// Check if a token stands for a construct the parser expected but did
    /// not find. Missing tokens have zero width.
    pub fn is_missing(&self, id: ElementId) -> bool {
        matches!(self.get(id).data, ElementData::Token { missing: true, .. })
    }

    /// Full extent of an element: its text plus all attached trivia.
    #[inline]
    pub fn full_span(&self, id: ElementId) -> Span {
        let element = self.get(id);
        Span::new(element.full_start, element.full_start + element.full_len)
    }

    /// Text extent of an element, excluding leading and trailing trivia.
    ///
    /// For a node this runs from the first token's text start to the last
    /// token's text end. Empty nodes yield an empty span at their full start.
    pub fn span(&self, id: ElementId) -> Span {
        let start = match self.first_token(id) {
            Some(token) => self.token_text_start(token),
            None => return Span::empty_at(self.get(id).full_start),
        };
        let end = match self.last_token(id) {
            Some(token) => self.token_text_end(token),
            None => start,
        };
        Span::new(start, end)
    }

    /// Leading trivia of a token. Empty for nodes.
    pub fn leading_trivia(&self, id: ElementId) -> &[Trivia] {
        match &self.get(id).data {
            ElementData::Token { leading, .. } => leading,
            ElementData::Node { .. } => &NO_TRIVIA,
        }
    }

    /// Trailing trivia of a token. Empty for nodes.
    pub fn trailing_trivia(&self, id: ElementId) -> &[Trivia] {
        match &self.get(id).data {
            ElementData::Token { trailing, .. } => trailing,
            ElementData::Node { .. } => &NO_TRIVIA,
        }
    }

    /// Check if a node has a direct token child that is missing or carries
    /// skipped trivia. Always false for tokens.
    pub fn has_skipped_or_missing_child(&self, id: ElementId) -> bool {
        matches!(
            self.get(id).data,
            ElementData::Node {
                error_child: true,
                ..
            }
        )
    }

    fn token_text_start(&self, id: ElementId) -> u32 {
        let element = self.get(id);
        let leading: u32 = self.leading_trivia(id).iter().map(|t| t.len).sum();
        element.full_start + leading
    }

    fn token_text_end(&self, id: ElementId) -> u32 {
        match self.get(id).data {
            ElementData::Token { text_len, .. } => self.token_text_start(id) + text_len,
            ElementData::Node { .. } => unreachable!("token_text_end on a node"),
        }
    }

    /// Text span of a token (its characters, without trivia).
    ///
    /// Must only be called on tokens.
    pub fn token_span(&self, id: ElementId) -> Span {
        debug_assert!(self.is_token(id), "token_span on a node");
        Span::new(self.token_text_start(id), self.token_text_end(id))
    }

    fn first_token(&self, id: ElementId) -> Option<ElementId> {
        if self.is_token(id) {
            return Some(id);
        }
        self.children(id)
            .iter()
            .find_map(|&child| self.first_token(child))
    }

    fn last_token(&self, id: ElementId) -> Option<ElementId> {
        if self.is_token(id) {
            return Some(id);
        }
        self.children(id)
            .iter()
            .rev()
            .find_map(|&child| self.last_token(child))
    }

    /// Find the token whose text span contains the given offset.
    ///
    /// Offsets that land in trivia (or outside the tree) yield `None`.
    pub fn token_at_offset(&self, offset: u32) -> Option<ElementId> {
        let mut current = self.root();
        loop {
            if self.is_token(current) {
                return self.token_span(current).contains(offset).then_some(current);
            }
            let next = self
                .children(current)
                .iter()
                .copied()
                .find(|&child| self.full_span(child).contains(offset))?;
            current = next;
        }
    }

    /// Number of elements in the tree.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the tree is empty (never true for built trees).
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Position marker for [`TreeBuilder::start_node_at`].
#[derive(Clone, Copy, Debug)]
pub struct Checkpoint {
    parent: usize,
    children: usize,
}

/// Builder assembling a [`SyntaxTree`] in document order.
///
/// The host parser (or a test harness) drives it with
/// `start_node`/`finish_node` around each construct and `token` for each
/// token with its trivia; the builder tracks absolute offsets and flags
/// nodes whose direct token children are erroneous.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    elements: Vec<Element>,
    stack: Vec<usize>,
    pos: u32,
}

impl TreeBuilder {
    /// Create an empty builder starting at offset zero.
    pub fn new() -> Self {
        TreeBuilder::default()
    }

    /// Open a node of the given kind.
    pub fn start_node(&mut self, kind: SyntaxKind) {
        debug_assert!(kind.is_node(), "{kind:?} is not a node kind");
        let parent = self.stack.last().map(|&index| ElementId(index as u32));
        let index = self.elements.len();
        self.elements.push(Element {
            kind,
            parent,
            full_start: self.pos,
            full_len: 0,
            data: ElementData::Node {
                children: Vec::new(),
                error_child: false,
            },
        });
        if let Some(&parent_index) = self.stack.last() {
            self.attach_child(parent_index, ElementId(index as u32));
        }
        self.stack.push(index);
    }

    /// Close the most recently opened node.
    pub fn finish_node(&mut self) {
        let index = self
            .stack
            .pop()
            .unwrap_or_else(|| panic!("finish_node with no open node"));
        let full_start = self.elements[index].full_start;
        self.elements[index].full_len = self.pos - full_start;
    }

    /// Add a token with no trivia.
    pub fn token(&mut self, kind: SyntaxKind, text_len: u32) {
        self.token_with_trivia(kind, text_len, Vec::new(), Vec::new());
    }

    /// Add a token together with its leading and trailing trivia.
    pub fn token_with_trivia(
        &mut self,
        kind: SyntaxKind,
        text_len: u32,
        leading: Vec<Trivia>,
        trailing: Vec<Trivia>,
    ) {
        debug_assert!(kind.is_token(), "{kind:?} is not a token kind");
        let parent_index = *self
            .stack
            .last()
            .unwrap_or_else(|| panic!("token added outside any node"));
        let has_skipped = leading.iter().chain(trailing.iter()).any(Trivia::is_skipped);

        let full_len: u32 = text_len
            + leading.iter().map(|t| t.len).sum::<u32>()
            + trailing.iter().map(|t| t.len).sum::<u32>();
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(Element {
            kind,
            parent: Some(ElementId(parent_index as u32)),
            full_start: self.pos,
            full_len,
            data: ElementData::Token {
                text_len,
                missing: false,
                leading,
                trailing,
            },
        });
        self.attach_child(parent_index, id);
        if has_skipped {
            self.mark_error(parent_index);
        }
        self.pos += full_len;
    }

    /// Add a zero-width placeholder for a token the parser expected but did
    /// not find. Flags the enclosing node as erroneous.
    pub fn missing_token(&mut self, kind: SyntaxKind) {
        debug_assert!(kind.is_token(), "{kind:?} is not a token kind");
        let parent_index = *self
            .stack
            .last()
            .unwrap_or_else(|| panic!("missing_token added outside any node"));
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(Element {
            kind,
            parent: Some(ElementId(parent_index as u32)),
            full_start: self.pos,
            full_len: 0,
            data: ElementData::Token {
                text_len: 0,
                missing: true,
                leading: Vec::new(),
                trailing: Vec::new(),
            },
        });
        self.attach_child(parent_index, id);
        self.mark_error(parent_index);
    }

    /// Remember the current position so a node can later be wrapped around
    /// everything added after this point.
    pub fn checkpoint(&self) -> Checkpoint {
        let parent = *self
            .stack
            .last()
            .unwrap_or_else(|| panic!("checkpoint outside any node"));
        let children = match &self.elements[parent].data {
            ElementData::Node { children, .. } => children.len(),
            ElementData::Token { .. } => unreachable!("stack holds only nodes"),
        };
        Checkpoint { parent, children }
    }

    /// Open a node of the given kind retroactively: every element added to
    /// the checkpointed node since the checkpoint becomes a child of the
    /// new node. The node still needs a matching [`TreeBuilder::finish_node`].
    ///
    /// The checkpointed node must be the currently open node.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        debug_assert!(kind.is_node(), "{kind:?} is not a node kind");
        assert_eq!(
            self.stack.last().copied(),
            Some(checkpoint.parent),
            "checkpointed node is no longer open"
        );

        let moved: Vec<ElementId> = match &mut self.elements[checkpoint.parent].data {
            ElementData::Node { children, .. } => children.split_off(checkpoint.children),
            ElementData::Token { .. } => unreachable!("stack holds only nodes"),
        };

        let full_start = moved
            .first()
            .map_or(self.pos, |&child| self.elements[child.index()].full_start);
        let index = self.elements.len();
        let id = ElementId(index as u32);

        for &child in &moved {
            self.elements[child.index()].parent = Some(id);
        }
        let moved_error = moved.iter().any(|&child| self.child_is_erroneous(child));
        let remaining_error = match &self.elements[checkpoint.parent].data {
            ElementData::Node { children, .. } => children.clone(),
            ElementData::Token { .. } => unreachable!("stack holds only nodes"),
        }
        .iter()
        .any(|&child| self.child_is_erroneous(child));

        self.elements.push(Element {
            kind,
            parent: Some(ElementId(checkpoint.parent as u32)),
            full_start,
            full_len: 0,
            data: ElementData::Node {
                children: moved,
                error_child: moved_error,
            },
        });
        self.attach_child(checkpoint.parent, id);
        if let ElementData::Node { error_child, .. } = &mut self.elements[checkpoint.parent].data {
            *error_child = remaining_error;
        }
        self.stack.push(index);
    }

    fn child_is_erroneous(&self, id: ElementId) -> bool {
        match &self.elements[id.index()].data {
            ElementData::Token {
                missing,
                leading,
                trailing,
                ..
            } => *missing || leading.iter().chain(trailing.iter()).any(Trivia::is_skipped),
            ElementData::Node { .. } => false,
        }
    }

    /// Finish building. All opened nodes must have been closed.
    pub fn finish(self) -> SyntaxTree {
        assert!(self.stack.is_empty(), "unfinished nodes remain");
        assert!(!self.elements.is_empty(), "tree has no root");
        SyntaxTree {
            elements: self.elements,
        }
    }

    fn attach_child(&mut self, parent_index: usize, child: ElementId) {
        match &mut self.elements[parent_index].data {
            ElementData::Node { children, .. } => children.push(child),
            ElementData::Token { .. } => unreachable!("tokens cannot have children"),
        }
    }

    fn mark_error(&mut self, parent_index: usize) {
        if let ElementData::Node { error_child, .. } = &mut self.elements[parent_index].data {
            *error_child = true;
        }
    }
}
