//! Monster query service
//!
//! Same tree shape as the item service; result lines additionally carry
//! the spawn location, and detail screens show combat stats and drops.

use std::fmt::Write as _;
use std::sync::Arc;

use itertools::Itertools;
use tracing::instrument;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::{
    page_offset, DetailActions, ResultsOverviewActions, ResultsOverviewContent, WikiPayload,
    WikiSeed, WikiTree,
};
use crate::domain::display::{
    pager_actions, Action, ActionRenderer, Content, ContentRenderer, DisplayStrategy, SelectMenu,
    SelectOption,
};
use crate::domain::entities::MonsterLeaf;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::{ChildSource, EnterHook, Node, NodeId, NodeSeed, PageTree};
use crate::infrastructure::traits::WikiStore;

/// Searches the store and builds browsable monster result trees.
pub struct MonsterQueryService {
    store: Arc<dyn WikiStore>,
    page_size: usize,
    result_limit: usize,
}

impl MonsterQueryService {
    pub fn new(store: Arc<dyn WikiStore>, page_size: usize, result_limit: usize) -> Self {
        Self {
            store,
            page_size,
            result_limit,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn search(&self, query: &str) -> ApplicationResult<WikiTree> {
        let matches = self
            .store
            .search_monsters(query, self.result_limit)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("search monsters for {query:?}"),
                source: Box::new(e),
            })?;
        if matches.is_empty() {
            return Err(ApplicationError::NoMatches {
                query: query.to_string(),
            });
        }

        let composites = matches.into_iter().map(|composite| {
            NodeSeed::promise(MonsterVariantSource {
                store: Arc::clone(&self.store),
            })
            .named(composite.name.clone())
            .payload(WikiPayload::MonsterComposite(composite))
            .strategy(DisplayStrategy::new(
                MonsterCompositeContent,
                MonsterCompositeActions,
            ))
        });

        let composite_chunks = composites.chunks(self.page_size);
        let pages = composite_chunks
            .into_iter()
            .map(|chunk| {
                NodeSeed::eager()
                    .strategy(DisplayStrategy::new(
                        MonsterResultsContent {
                            page_size: self.page_size,
                        },
                        MonsterResultsActions {
                            page_size: self.page_size,
                        },
                    ))
                    .children(chunk)
            })
            .collect::<Vec<_>>();

        let root = NodeSeed::eager()
            .named(format!("results: {query}"))
            .on_enter(EnterHook::DescendFirst)
            .strategy(DisplayStrategy::new(ResultsOverviewContent, ResultsOverviewActions))
            .children(pages);
        Ok(PageTree::new(root))
    }
}

/// Generates the difficulty-variant detail leaves of one spawn.
struct MonsterVariantSource {
    store: Arc<dyn WikiStore>,
}

impl ChildSource<WikiPayload> for MonsterVariantSource {
    fn generate(&self, placeholder: &Node<WikiPayload>) -> DomainResult<Vec<WikiSeed>> {
        let Some(WikiPayload::MonsterComposite(composite)) = placeholder.payload() else {
            return Ok(Vec::new());
        };
        composite
            .leaves
            .iter()
            .map(|variant| {
                let leaf = self.store.monster_leaf(&variant.leaf_id).map_err(|e| {
                    DomainError::UpstreamFailure {
                        context: format!("monster leaf {}", variant.leaf_id),
                        source: Box::new(e),
                    }
                })?;
                Ok(NodeSeed::eager()
                    .named(leaf.name.clone())
                    .payload(WikiPayload::MonsterLeaf(Box::new(leaf)))
                    .strategy(DisplayStrategy::new(MonsterLeafContent, DetailActions)))
            })
            .collect()
    }
}

// ------------------------------------------------------------
// Renderers
// ------------------------------------------------------------

/// Spawn location shown next to each result line.
fn composite_location(tree: &WikiTree, node: NodeId) -> Option<&str> {
    match tree.get(node)?.payload()? {
        WikiPayload::MonsterComposite(composite) => Some(composite.location.display.as_str()),
        _ => None,
    }
}

fn result_line(tree: &WikiTree, child: NodeId, number: usize) -> String {
    let name = tree.get(child).map(|n| n.label()).unwrap_or_default();
    match composite_location(tree, child) {
        Some(location) => format!("> {number}. {name} [{location}]"),
        None => format!("> {number}. {name}"),
    }
}

struct MonsterResultsContent {
    page_size: usize,
}

impl ContentRenderer<WikiPayload> for MonsterResultsContent {
    fn content(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Content> {
        let offset = page_offset(tree, node, self.page_size);
        let (index, count) = tree.sibling_position(node).unwrap_or((0, 1));
        let children = tree.get(node).map(|n| n.children()).unwrap_or_default();
        let body = children
            .iter()
            .enumerate()
            .map(|(i, &child)| result_line(tree, child, offset + i))
            .join("\n");
        Ok(Content::new(body)
            .titled("Results")
            .with_footer(format!("Page {}/{}", index + 1, count)))
    }
}

struct MonsterResultsActions {
    page_size: usize,
}

impl ActionRenderer<WikiPayload> for MonsterResultsActions {
    fn actions(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Vec<Action>> {
        let (_, count) = tree.sibling_position(node).unwrap_or((0, 1));
        let offset = page_offset(tree, node, self.page_size);
        let children = tree.get(node).map(|n| n.children()).unwrap_or_default();
        // Location-suffixed labels, unlike the generic child menu.
        let options = children
            .iter()
            .enumerate()
            .map(|(i, &child)| SelectOption {
                label: result_line(tree, child, offset + i).trim_start_matches("> ").to_string(),
                target: child,
            })
            .collect();
        let menu = SelectMenu {
            placeholder: "More Information...".to_string(),
            options,
        };
        Ok(pager_actions(count, menu))
    }
}

/// One spawn: its materialized difficulty variants with level tags.
struct MonsterCompositeContent;

impl ContentRenderer<WikiPayload> for MonsterCompositeContent {
    fn content(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Content> {
        let children = tree.get(node).map(|n| n.children()).unwrap_or_default();
        let body = children
            .iter()
            .enumerate()
            .map(|(i, &child)| format!("> {}. {}", i + 1, variant_line(tree, child)))
            .join("\n");
        Ok(Content::new(body)
            .titled(tree.get(node).map(|n| n.label().to_string()).unwrap_or_default()))
    }
}

struct MonsterCompositeActions;

impl ActionRenderer<WikiPayload> for MonsterCompositeActions {
    fn actions(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Vec<Action>> {
        let children = tree.get(node).map(|n| n.children()).unwrap_or_default();
        let options = children
            .iter()
            .enumerate()
            .map(|(i, &child)| SelectOption {
                label: format!("{}. {}", i + 1, variant_line(tree, child)),
                target: child,
            })
            .collect();
        Ok(vec![
            Action::Back,
            Action::Select(SelectMenu {
                placeholder: "More Information...".to_string(),
                options,
            }),
        ])
    }
}

fn variant_line(tree: &WikiTree, child: NodeId) -> String {
    let name = tree.get(child).map(|n| n.label()).unwrap_or_default();
    match tree.get(child).and_then(Node::payload) {
        Some(WikiPayload::MonsterLeaf(leaf)) => {
            let difficulty = leaf.difficulty.as_deref().unwrap_or("-");
            format!("{name} [{}] [{difficulty}]", leaf.level)
        }
        _ => name.to_string(),
    }
}

/// Full detail screen of one monster variant.
struct MonsterLeafContent;

impl ContentRenderer<WikiPayload> for MonsterLeafContent {
    fn content(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Content> {
        let Some(WikiPayload::MonsterLeaf(leaf)) = tree.get(node).and_then(Node::payload) else {
            return Ok(Content::default());
        };
        Ok(Content::new(monster_leaf_body(leaf))
            .titled(leaf.name.clone())
            .with_footer("Credits: coryn.club"))
    }
}

fn monster_leaf_body(leaf: &MonsterLeaf) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "Level: {}", leaf.level);
    if let Some(difficulty) = &leaf.difficulty {
        let _ = writeln!(body, "Difficulty: {difficulty}");
    }
    if let Some(hp) = leaf.hp {
        let _ = writeln!(body, "HP: {hp}");
    }
    if let Some(element) = &leaf.element {
        let _ = writeln!(body, "Element: {element}");
    }
    if let Some(exp) = leaf.exp {
        let _ = writeln!(body, "EXP: {exp}");
    }
    let _ = writeln!(body, "Tamable: {}", if leaf.tamable { "Yes" } else { "No" });
    let _ = writeln!(body, "Location: {}", leaf.location.display);
    if !leaf.drops.is_empty() {
        let _ = writeln!(body, "Drops:");
        for drop in &leaf.drops {
            match &drop.dye {
                Some(dye) => {
                    let _ = writeln!(body, "  {} [Dye: {dye}]", drop.name.display);
                }
                None => {
                    let _ = writeln!(body, "  {}", drop.name.display);
                }
            }
        }
    }
    body.trim_end().to_string()
}
