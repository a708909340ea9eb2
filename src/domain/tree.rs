//! Arena-based tree of browsable screens.
//!
//! Uses a generational arena for memory-safe node references and O(1)
//! lookups. Each tree represents one complete result hierarchy, owned by
//! exactly one session. Nodes come in two kinds: `Eager` nodes whose
//! children are fully known when the tree is built, and `Promise` nodes
//! whose children are generated on demand when the cursor descends into
//! them and evicted again when it leaves toward the parent.
//!
//! Nodes enter the tree as [`NodeSeed`] blueprints. Planting a seed
//! assigns its id and parent link in one step, so a parent is written
//! exactly once and no cycle can be constructed.

use std::fmt;
use std::sync::Arc;

use generational_arena::{Arena, Index};
use tracing::{instrument, trace};

use crate::domain::display::{Action, Content, DisplayStrategy};
use crate::domain::error::{DomainError, DomainResult};

/// Stable handle to a node. Generational, so a handle to an evicted node
/// can never alias a later insertion.
pub type NodeId = Index;

/// Child lookup key: exact id, or first structural match by name.
///
/// Sibling names are not required to be unique; name lookup returns the
/// first match in sibling order. Id lookup is always exact.
#[derive(Debug, Clone)]
pub enum Selector<'a> {
    Id(NodeId),
    Name(&'a str),
}

impl From<NodeId> for Selector<'static> {
    fn from(id: NodeId) -> Self {
        Selector::Id(id)
    }
}

impl<'a> From<&'a str> for Selector<'a> {
    fn from(name: &'a str) -> Self {
        Selector::Name(name)
    }
}

impl fmt::Display for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => {
                let (index, generation) = id.into_raw_parts();
                write!(f, "#{index}v{generation}")
            }
            Selector::Name(name) => write!(f, "{name:?}"),
        }
    }
}

/// Produces the children of a Promise node when the cursor descends into
/// it. This is the only suspension point of the navigation engine: the
/// implementation typically reads detail records from the backing store.
///
/// Generation must be an idempotent read. It is re-run on every fresh
/// visit (children are evicted when the cursor leaves toward the parent).
pub trait ChildSource<P>: Send + Sync {
    fn generate(&self, placeholder: &Node<P>) -> DomainResult<Vec<NodeSeed<P>>>;
}

/// Materialization strategy of a node.
pub enum NodeKind<P> {
    /// Children fully known at construction.
    Eager,
    /// Children generated on demand by the held source.
    Promise(Arc<dyn ChildSource<P>>),
}

impl<P> NodeKind<P> {
    pub fn is_promise(&self) -> bool {
        matches!(self, NodeKind::Promise(_))
    }
}

impl<P> Clone for NodeKind<P> {
    fn clone(&self) -> Self {
        match self {
            NodeKind::Eager => NodeKind::Eager,
            NodeKind::Promise(source) => NodeKind::Promise(Arc::clone(source)),
        }
    }
}

impl<P> fmt::Debug for NodeKind<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Eager => write!(f, "Eager"),
            NodeKind::Promise(_) => write!(f, "Promise"),
        }
    }
}

/// Optional behavior applied after the cursor enters a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterHook {
    /// Descend into the sole child, skipping screens that would show a
    /// single entry.
    DescendIfOnlyChild,
    /// Descend into the first child (paginated roots land on page one).
    DescendFirst,
}

/// Blueprint for a node and its eagerly-known descendants.
///
/// Seeds are built by the query services and by [`ChildSource`]
/// generators, then planted into the arena.
pub struct NodeSeed<P> {
    pub(crate) name: Option<String>,
    pub(crate) payload: Option<P>,
    pub(crate) kind: NodeKind<P>,
    pub(crate) strategy: Option<DisplayStrategy<P>>,
    pub(crate) on_enter: Option<EnterHook>,
    pub(crate) children: Vec<NodeSeed<P>>,
}

impl<P> NodeSeed<P> {
    /// A node whose children (if any) are attached up front.
    pub fn eager() -> Self {
        Self {
            name: None,
            payload: None,
            kind: NodeKind::Eager,
            strategy: None,
            on_enter: None,
            children: Vec::new(),
        }
    }

    /// A placeholder whose children are generated on first descent.
    pub fn promise(source: impl ChildSource<P> + 'static) -> Self {
        Self {
            kind: NodeKind::Promise(Arc::new(source)),
            ..Self::eager()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn payload(mut self, payload: P) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn strategy(mut self, strategy: DisplayStrategy<P>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn on_enter(mut self, hook: EnterHook) -> Self {
        self.on_enter = Some(hook);
        self
    }

    pub fn child(mut self, child: NodeSeed<P>) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = NodeSeed<P>>) -> Self {
        self.children.extend(children);
        self
    }
}

/// One addressable screen and its position in the hierarchy.
pub struct Node<P> {
    name: Option<String>,
    payload: Option<P>,
    /// Non-owning back-reference; `None` only for the root.
    parent: Option<NodeId>,
    /// Owned, ordered; defines sibling order for first/last/next/previous.
    children: Vec<NodeId>,
    kind: NodeKind<P>,
    strategy: Option<DisplayStrategy<P>>,
    on_enter: Option<EnterHook>,
}

impl<P> Node<P> {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn kind(&self) -> &NodeKind<P> {
        &self.kind
    }

    pub fn on_enter(&self) -> Option<EnterHook> {
        self.on_enter
    }

    /// Display label for diagnostics and error messages.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }
}

// The payload is domain-opaque, so Debug prints structure only.
impl<P> fmt::Debug for Node<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("children", &self.children.len())
            .finish()
    }
}

/// Arena-backed screen tree.
///
/// One tree per session; the owning [`Controller`](crate::domain::Controller)
/// is the sole mutator once navigation starts.
pub struct PageTree<P> {
    arena: Arena<Node<P>>,
    root: NodeId,
}

impl<P> PageTree<P> {
    /// Plant the root seed and its eager descendants.
    pub fn new(seed: NodeSeed<P>) -> Self {
        let mut arena = Arena::new();
        let root = plant(&mut arena, None, seed);
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<P>> {
        self.arena.get(id)
    }

    /// Plant a subtree under an existing parent. Sibling order is
    /// insertion order.
    #[instrument(level = "trace", skip(self, seed))]
    pub fn add_child(&mut self, parent: NodeId, seed: NodeSeed<P>) -> NodeId {
        plant(&mut self.arena, Some(parent), seed)
    }

    /// Pure structural lookup among `parent`'s children. Id lookup is
    /// exact; name lookup returns the first match in sibling order.
    #[instrument(level = "trace", skip(self))]
    pub fn find_child(&self, parent: NodeId, selector: Selector<'_>) -> DomainResult<NodeId> {
        let children = self
            .get(parent)
            .map(Node::children)
            .ok_or_else(|| DomainError::NotFound {
                selector: selector.to_string(),
            })?;
        match &selector {
            Selector::Id(id) => children.iter().copied().find(|c| c == id),
            Selector::Name(name) => children
                .iter()
                .copied()
                .find(|&c| self.get(c).and_then(Node::name) == Some(*name)),
        }
        .ok_or_else(|| DomainError::NotFound {
            selector: selector.to_string(),
        })
    }

    /// Resolve a child by selector, materializing it first if it is an
    /// unmaterialized Promise placeholder.
    pub fn resolve_child(&mut self, parent: NodeId, selector: Selector<'_>) -> DomainResult<NodeId> {
        let target = self.find_child(parent, selector)?;
        self.materialize(target)?;
        Ok(target)
    }

    /// Run a Promise node's generator and plant the produced children.
    ///
    /// No-op for Eager nodes and for Promise nodes that still hold
    /// children from the current visit. On generator failure nothing is
    /// planted and the tree is unchanged.
    #[instrument(level = "debug", skip(self))]
    pub fn materialize(&mut self, id: NodeId) -> DomainResult<()> {
        let seeds = {
            let node = match self.arena.get(id) {
                Some(node) => node,
                None => return Ok(()),
            };
            let source = match node.kind {
                NodeKind::Promise(ref source) if node.children.is_empty() => Arc::clone(source),
                _ => return Ok(()),
            };
            source.generate(node)?
        };
        trace!(count = seeds.len(), "materialized children");
        for seed in seeds {
            plant(&mut self.arena, Some(id), seed);
        }
        Ok(())
    }

    /// Remove all descendants of `id`, freeing their arena slots. The
    /// node itself stays; its next visit re-runs the generator.
    #[instrument(level = "debug", skip(self))]
    pub fn evict_children(&mut self, id: NodeId) {
        let mut stack = match self.arena.get_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children);
            }
        }
    }

    /// Index of `id` among its siblings and the sibling count, for
    /// pagination chrome. `None` for the root.
    pub fn sibling_position(&self, id: NodeId) -> Option<(usize, usize)> {
        let parent = self.get(id)?.parent?;
        let siblings = self.get(parent)?.children();
        let index = siblings.iter().position(|&c| c == id)?;
        Some((index, siblings.len()))
    }

    /// Render the node's body via its bound content renderer.
    pub fn content(&self, id: NodeId) -> DomainResult<Content> {
        let node = self.expect_node(id)?;
        match node.strategy.as_ref().and_then(|s| s.content.as_ref()) {
            Some(renderer) => renderer.content(self, id),
            None => Err(DomainError::MissingDisplayStrategy {
                node: node.label().to_string(),
            }),
        }
    }

    /// Render the node's ordered action list via its bound action renderer.
    pub fn actions(&self, id: NodeId) -> DomainResult<Vec<Action>> {
        let node = self.expect_node(id)?;
        match node.strategy.as_ref().and_then(|s| s.actions.as_ref()) {
            Some(renderer) => renderer.actions(self, id),
            None => Err(DomainError::MissingDisplayStrategy {
                node: node.label().to_string(),
            }),
        }
    }

    fn expect_node(&self, id: NodeId) -> DomainResult<&Node<P>> {
        self.get(id).ok_or_else(|| DomainError::NotFound {
            selector: Selector::Id(id).to_string(),
        })
    }

    /// Depth-first iterator over all live nodes, children in sibling order.
    pub fn iter(&self) -> TreeIter<'_, P> {
        TreeIter {
            tree: self,
            stack: vec![self.root],
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth_below(self.root)
    }

    fn depth_below(&self, id: NodeId) -> usize {
        match self.get(id) {
            Some(node) => {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.depth_below(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }
}

impl<P> fmt::Debug for PageTree<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageTree")
            .field("len", &self.arena.len())
            .field("root", &self.root)
            .finish()
    }
}

/// Insert a seed and its eager descendants; parents are linked exactly
/// once, at insertion.
fn plant<P>(arena: &mut Arena<Node<P>>, parent: Option<NodeId>, seed: NodeSeed<P>) -> NodeId {
    let NodeSeed {
        name,
        payload,
        kind,
        strategy,
        on_enter,
        children,
    } = seed;
    let id = arena.insert(Node {
        name,
        payload,
        parent,
        children: Vec::new(),
        kind,
        strategy,
        on_enter,
    });
    if let Some(parent_id) = parent {
        if let Some(parent_node) = arena.get_mut(parent_id) {
            parent_node.children.push(id);
        }
    }
    for child in children {
        plant(arena, Some(id), child);
    }
    id
}

pub struct TreeIter<'a, P> {
    tree: &'a PageTree<P>,
    stack: Vec<NodeId>,
}

impl<'a, P> Iterator for TreeIter<'a, P> {
    type Item = (NodeId, &'a Node<P>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}
