//! Display-strategy binding: what a screen shows, decoupled from what kind
//! of node it is.
//!
//! A node carries an optional pair of renderers. Both are stateless
//! functions of the tree and the node, re-evaluated on every render, so
//! pagination chrome ("page 3/7") always reflects the live sibling
//! position.

use std::fmt;
use std::sync::Arc;

use crate::domain::error::DomainResult;
use crate::domain::tree::{NodeId, PageTree};

/// One screen of renderable text, platform-neutral.
///
/// The front-end adapter decides how title/body/footer map onto its
/// widgets (an embed, a terminal block, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    pub title: Option<String>,
    pub body: String,
    pub footer: Option<String>,
}

impl Content {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: body.into(),
            footer: None,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

/// One option of a [`Action::Select`] menu, pointing at a child node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub target: NodeId,
}

/// Drill-down menu over a node's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectMenu {
    pub placeholder: String,
    pub options: Vec<SelectOption>,
}

/// An ordered navigation control offered by the current screen.
///
/// The adapter maps these onto its own widgets and translates activation
/// back into controller calls (`BackTwice` is two `goto_parent` calls).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    First,
    Previous,
    Next,
    Last,
    Back,
    BackTwice,
    Select(SelectMenu),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::First => write!(f, "|<"),
            Action::Previous => write!(f, "<"),
            Action::Next => write!(f, ">"),
            Action::Last => write!(f, ">|"),
            Action::Back => write!(f, "back"),
            Action::BackTwice => write!(f, "back x2"),
            Action::Select(menu) => write!(f, "select ({})", menu.options.len()),
        }
    }
}

/// Renders the body of a screen from the node it is bound to.
pub trait ContentRenderer<P>: Send + Sync {
    fn content(&self, tree: &PageTree<P>, node: NodeId) -> DomainResult<Content>;
}

/// Renders the ordered action list of a screen from the node it is bound to.
pub trait ActionRenderer<P>: Send + Sync {
    fn actions(&self, tree: &PageTree<P>, node: NodeId) -> DomainResult<Vec<Action>>;
}

/// Per-node pluggable renderer pair. Both halves are independently
/// optional; an unbound half surfaces `MissingDisplayStrategy` on render.
pub struct DisplayStrategy<P> {
    pub content: Option<Arc<dyn ContentRenderer<P>>>,
    pub actions: Option<Arc<dyn ActionRenderer<P>>>,
}

impl<P> DisplayStrategy<P> {
    pub fn new(
        content: impl ContentRenderer<P> + 'static,
        actions: impl ActionRenderer<P> + 'static,
    ) -> Self {
        Self {
            content: Some(Arc::new(content)),
            actions: Some(Arc::new(actions)),
        }
    }

    pub fn content_only(content: impl ContentRenderer<P> + 'static) -> Self {
        Self {
            content: Some(Arc::new(content)),
            actions: None,
        }
    }
}

impl<P> Clone for DisplayStrategy<P> {
    fn clone(&self) -> Self {
        Self {
            content: self.content.clone(),
            actions: self.actions.clone(),
        }
    }
}

impl<P> fmt::Debug for DisplayStrategy<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayStrategy")
            .field("content", &self.content.is_some())
            .field("actions", &self.actions.is_some())
            .finish()
    }
}

/// Standard sibling-pager chrome: which pager buttons a paginated screen
/// offers for a given sibling count, followed by the drill-down menu.
pub fn pager_actions(sibling_count: usize, menu: SelectMenu) -> Vec<Action> {
    match sibling_count {
        0 | 1 => vec![Action::Select(menu)],
        2 => vec![Action::Previous, Action::Next, Action::Select(menu)],
        _ => vec![
            Action::First,
            Action::Previous,
            Action::Next,
            Action::Last,
            Action::Select(menu),
        ],
    }
}
