//! Per-pass ancestry contexts and the common-ancestor search.
//!
//! While walking, the formatter carries "the node currently enclosing this
//! token" forward instead of re-deriving it from the tree. Those contexts
//! live in a flat arena scoped to one pass: parent links are indices, depth
//! is cached, and the whole arena drops in bulk when the pass ends.
//!
//! Identity of the underlying syntax node is its stable [`ElementId`], so
//! the lock-step ancestor comparison stays valid however contexts are
//! duplicated during the walk.

use riva_syntax::ElementId;

use crate::FormatError;

/// Index of one ancestry context within a pass-local [`AncestryArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AncestryId(u32);

#[derive(Debug)]
struct AncestryNode {
    element: ElementId,
    depth: u32,
    parent: Option<AncestryId>,
}

/// Flat arena of ancestry contexts for a single formatting pass.
#[derive(Debug, Default)]
pub struct AncestryArena {
    nodes: Vec<AncestryNode>,
}

impl AncestryArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        AncestryArena::default()
    }

    /// Add a context for `element` under `parent` (`None` for the root).
    /// Depth is derived from the parent link.
    pub fn alloc(&mut self, element: ElementId, parent: Option<AncestryId>) -> AncestryId {
        let depth = parent.map_or(0, |p| self.depth(p) + 1);
        let id = AncestryId(self.nodes.len() as u32);
        self.nodes.push(AncestryNode {
            element,
            depth,
            parent,
        });
        id
    }

    /// The syntax element a context wraps.
    #[inline]
    pub fn element(&self, id: AncestryId) -> ElementId {
        self.nodes[id.0 as usize].element
    }

    /// Distance of a context from the document root.
    #[inline]
    pub fn depth(&self, id: AncestryId) -> u32 {
        self.nodes[id.0 as usize].depth
    }

    /// Parent context, `None` at the root.
    #[inline]
    pub fn parent(&self, id: AncestryId) -> Option<AncestryId> {
        self.nodes[id.0 as usize].parent
    }

    /// Number of contexts allocated in this pass.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no context was allocated yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Lowest common ancestor of two ancestry chains.
    ///
    /// Ascends the deeper chain until depths match, then walks both chains
    /// in lock step comparing element identity. Both chains of a valid tree
    /// converge on the document root, so exhausting them is an internal
    /// invariant violation, not a recoverable condition.
    pub fn common_ancestor(&self, a: AncestryId, b: AncestryId) -> Result<ElementId, FormatError> {
        let (mut deep, shallow) = if self.depth(a) >= self.depth(b) {
            (a, b)
        } else {
            (b, a)
        };

        while self.depth(deep) > self.depth(shallow) {
            deep = self.parent(deep).ok_or(FormatError::NoCommonAncestor)?;
        }
        debug_assert_eq!(self.depth(deep), self.depth(shallow));

        let mut left = Some(deep);
        let mut right = Some(shallow);
        while let (Some(l), Some(r)) = (left, right) {
            if self.element(l) == self.element(r) {
                return Ok(self.element(l));
            }
            left = self.parent(l);
            right = self.parent(r);
        }

        Err(FormatError::NoCommonAncestor)
    }
}
