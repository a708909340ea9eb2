//! Stateful cursor over one screen tree.
//!
//! The controller owns the tree and is its sole mutator once navigation
//! starts. Boundary conditions (root, first/last sibling) are silent
//! no-ops; an invalid selector is always surfaced as `NotFound`. The
//! cursor only moves after a navigation call fully succeeded, so a failed
//! materialization leaves the session exactly where it was.

use tracing::{debug, instrument};

use crate::domain::display::{Action, Content};
use crate::domain::error::DomainResult;
use crate::domain::tree::{EnterHook, Node, NodeId, PageTree, Selector};

pub struct Controller<P> {
    tree: PageTree<P>,
    current: NodeId,
}

impl<P> Controller<P> {
    /// Take ownership of a tree and place the cursor on its root, then
    /// apply the root's on-enter hook (a paginated root descends straight
    /// onto its first page; a single-result root skips the empty
    /// intermediate screen).
    pub fn new(tree: PageTree<P>) -> DomainResult<Self> {
        let current = tree.root();
        let mut controller = Self { tree, current };
        controller.apply_enter_hook()?;
        Ok(controller)
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn current_node(&self) -> &Node<P> {
        // Invariant: the cursor always points at a live node. Eviction
        // only removes strict descendants of the node being left.
        self.tree
            .get(self.current)
            .unwrap_or_else(|| unreachable!("cursor points at evicted node"))
    }

    pub fn tree(&self) -> &PageTree<P> {
        &self.tree
    }

    /// Render the current screen's body.
    pub fn content(&self) -> DomainResult<Content> {
        self.tree.content(self.current)
    }

    /// Render the current screen's action list.
    pub fn actions(&self) -> DomainResult<Vec<Action>> {
        self.tree.actions(self.current)
    }

    /// Move to the parent. Leaving a Promise node evicts its children so
    /// the next visit regenerates them. Silent no-op at the root.
    #[instrument(level = "debug", skip(self))]
    pub fn goto_parent(&mut self) {
        let (parent, is_promise) = {
            let node = self.current_node();
            (node.parent(), node.kind().is_promise())
        };
        let Some(parent) = parent else {
            return;
        };
        if is_promise {
            self.tree.evict_children(self.current);
        }
        self.current = parent;
    }

    /// Descend into a child: resolve the selector, materialize the target
    /// if needed, move the cursor, then apply the target's on-enter hook.
    ///
    /// Fails with `NotFound` for unknown selectors (including stale ids of
    /// evicted children) and with `UpstreamFailure` if materialization
    /// fails; the cursor is unchanged on any failure.
    #[instrument(level = "debug", skip(self))]
    pub fn goto_child(&mut self, selector: Selector<'_>) -> DomainResult<()> {
        let target = self.tree.resolve_child(self.current, selector)?;
        self.current = target;
        debug!(node = self.current_node().label(), "entered child");
        self.apply_enter_hook()
    }

    /// Jump to the first sibling. No-op at the root.
    pub fn goto_first_sibling(&mut self) {
        self.goto_sibling(|_, _| 0);
    }

    /// Jump to the last sibling. No-op at the root.
    pub fn goto_last_sibling(&mut self) {
        self.goto_sibling(|_, count| count - 1);
    }

    /// Move one sibling to the right; clamped, never wrapped.
    pub fn goto_next_sibling(&mut self) {
        self.goto_sibling(|index, count| (index + 1).min(count - 1));
    }

    /// Move one sibling to the left; clamped, never wrapped.
    pub fn goto_previous_sibling(&mut self) {
        self.goto_sibling(|index, _| index.saturating_sub(1));
    }

    fn goto_sibling(&mut self, pick: impl Fn(usize, usize) -> usize) {
        let Some(parent) = self.current_node().parent() else {
            return;
        };
        let Some((index, count)) = self.tree.sibling_position(self.current) else {
            return;
        };
        let Some(siblings) = self.tree.get(parent).map(Node::children) else {
            return;
        };
        self.current = siblings[pick(index, count)];
    }

    /// Apply on-enter hooks transitively (a hop may land on another node
    /// that also carries a hook). Hook descents materialize like any other
    /// descent.
    fn apply_enter_hook(&mut self) -> DomainResult<()> {
        loop {
            let node = self.current_node();
            let target = match (node.on_enter(), node.children()) {
                (Some(EnterHook::DescendIfOnlyChild), [only]) => *only,
                (Some(EnterHook::DescendFirst), [first, ..]) => *first,
                _ => return Ok(()),
            };
            self.tree.materialize(target)?;
            self.current = target;
            debug!(node = self.current_node().label(), "auto-descended");
        }
    }
}
