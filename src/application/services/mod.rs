//! Application services
//!
//! Concrete services that orchestrate the navigation engine over the
//! backing store: one query service per content domain plus the session
//! registry. Services depend on the `WikiStore` boundary trait but are
//! themselves concrete structs, not traits.

mod item_query;
mod levelling_query;
mod monster_query;
mod session;

pub use item_query::ItemQueryService;
pub use levelling_query::LevellingQueryService;
pub use monster_query::MonsterQueryService;
pub use session::{Session, SessionId, SessionService};

use crate::domain::display::{
    Action, ActionRenderer, Content, ContentRenderer, SelectMenu, SelectOption,
};
use crate::domain::entities::{ItemComposite, ItemLeaf, LevellingRow, MonsterComposite, MonsterLeaf};
use crate::domain::controller::Controller;
use crate::domain::error::DomainResult;
use crate::domain::tree::{Node, NodeId, NodeSeed, PageTree};

/// Closed payload variant covering every screen the query services build.
/// Renderers match on this to know what a node carries; the navigation
/// engine itself never looks inside.
#[derive(Debug, Clone)]
pub enum WikiPayload {
    ItemComposite(ItemComposite),
    ItemLeaf(Box<ItemLeaf>),
    MonsterComposite(MonsterComposite),
    MonsterLeaf(Box<MonsterLeaf>),
    LevellingSpots(Vec<LevellingRow>),
}

pub type WikiTree = PageTree<WikiPayload>;
pub type WikiSeed = NodeSeed<WikiPayload>;
pub type WikiNode = Node<WikiPayload>;
pub type WikiController = Controller<WikiPayload>;

/// Number of results shown per paginated screen when unconfigured.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Maximum composites pulled from the store per query when unconfigured.
pub const DEFAULT_RESULT_LIMIT: usize = 25;

/// First result number on a page: pages before this one each hold
/// `page_size` entries.
fn page_offset(tree: &WikiTree, page: NodeId, page_size: usize) -> usize {
    let (index, _) = tree.sibling_position(page).unwrap_or((0, 1));
    index * page_size + 1
}

/// Drill-down menu over a node's children, labels numbered from `offset`.
fn child_select_menu(tree: &WikiTree, node: NodeId, offset: usize) -> SelectMenu {
    let children = tree.get(node).map(|n| n.children()).unwrap_or_default();
    let options = children
        .iter()
        .enumerate()
        .map(|(i, &child)| SelectOption {
            label: format!(
                "{}. {}",
                offset + i,
                tree.get(child).map(|n| n.label()).unwrap_or_default()
            ),
            target: child,
        })
        .collect();
    SelectMenu {
        placeholder: "More Information...".to_string(),
        options,
    }
}

/// Shared action renderer for detail screens: back only.
struct DetailActions;

impl ActionRenderer<WikiPayload> for DetailActions {
    fn actions(&self, _tree: &WikiTree, _node: NodeId) -> DomainResult<Vec<Action>> {
        Ok(vec![Action::Back])
    }
}

/// Shared action renderer for composite screens: back plus a drill-down
/// menu over the materialized variants.
struct CompositeActions;

impl ActionRenderer<WikiPayload> for CompositeActions {
    fn actions(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Vec<Action>> {
        Ok(vec![
            Action::Back,
            Action::Select(child_select_menu(tree, node, 1)),
        ])
    }
}

/// Root overview behind the paginated screens; normally skipped by the
/// root's auto-descend but still a complete screen when navigated to.
struct ResultsOverviewContent;

impl ContentRenderer<WikiPayload> for ResultsOverviewContent {
    fn content(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Content> {
        let pages = tree.get(node).map(|n| n.children().len()).unwrap_or(0);
        let results: usize = tree
            .get(node)
            .map(|n| {
                n.children()
                    .iter()
                    .filter_map(|&page| tree.get(page))
                    .map(|page| page.children().len())
                    .sum()
            })
            .unwrap_or(0);
        Ok(
            Content::new(format!("{results} results across {pages} pages")).titled(
                tree.get(node)
                    .map(|n| n.label().to_string())
                    .unwrap_or_default(),
            ),
        )
    }
}

struct ResultsOverviewActions;

impl ActionRenderer<WikiPayload> for ResultsOverviewActions {
    fn actions(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Vec<Action>> {
        let children = tree.get(node).map(|n| n.children()).unwrap_or_default();
        let options = children
            .iter()
            .enumerate()
            .map(|(i, &page)| SelectOption {
                label: format!("Page {}", i + 1),
                target: page,
            })
            .collect();
        Ok(vec![Action::Select(SelectMenu {
            placeholder: "Open page...".to_string(),
            options,
        })])
    }
}
