//! Item query service
//!
//! Builds the item result tree: paginated result screens fan out cheap
//! composite summaries; descending into a composite runs its generator,
//! which fetches the full variant detail records from the store.

use std::fmt::Write as _;
use std::sync::Arc;

use itertools::Itertools;
use tracing::instrument;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::{
    child_select_menu, page_offset, CompositeActions, DetailActions, ResultsOverviewActions,
    ResultsOverviewContent, WikiPayload, WikiSeed, WikiTree,
};
use crate::domain::display::{
    pager_actions, Action, ActionRenderer, Content, ContentRenderer, DisplayStrategy,
};
use crate::domain::entities::{ItemLeaf, ItemVariantRef};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::{ChildSource, EnterHook, Node, NodeId, NodeSeed, PageTree};
use crate::infrastructure::traits::WikiStore;

/// Searches the store and builds browsable item result trees.
pub struct ItemQueryService {
    store: Arc<dyn WikiStore>,
    page_size: usize,
    result_limit: usize,
}

impl ItemQueryService {
    pub fn new(store: Arc<dyn WikiStore>, page_size: usize, result_limit: usize) -> Self {
        Self {
            store,
            page_size,
            result_limit,
        }
    }

    /// Build the result tree for one query.
    ///
    /// Shape: root (auto-descends to page one), result pages, composite
    /// placeholders (Promise), and variant detail leaves generated on
    /// descent.
    #[instrument(level = "debug", skip(self))]
    pub fn search(&self, query: &str) -> ApplicationResult<WikiTree> {
        let matches = self
            .store
            .search_items(query, self.result_limit)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("search items for {query:?}"),
                source: Box::new(e),
            })?;
        if matches.is_empty() {
            return Err(ApplicationError::NoMatches {
                query: query.to_string(),
            });
        }

        let composites = matches.into_iter().map(|composite| {
            NodeSeed::promise(ItemVariantSource {
                store: Arc::clone(&self.store),
            })
            .named(composite.name.clone())
            .payload(WikiPayload::ItemComposite(composite))
            .strategy(DisplayStrategy::new(ItemCompositeContent, CompositeActions))
        });

        let composite_chunks = composites.chunks(self.page_size);
        let pages = composite_chunks
            .into_iter()
            .map(|chunk| {
                NodeSeed::eager()
                    .strategy(DisplayStrategy::new(
                        ItemResultsContent {
                            page_size: self.page_size,
                        },
                        ItemResultsActions {
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

/// Generates the variant detail leaves of one composite; this is the
/// expensive fetch deferred until the user actually picks a result.
struct ItemVariantSource {
    store: Arc<dyn WikiStore>,
}

impl ChildSource<WikiPayload> for ItemVariantSource {
    fn generate(&self, placeholder: &Node<WikiPayload>) -> DomainResult<Vec<WikiSeed>> {
        let Some(WikiPayload::ItemComposite(composite)) = placeholder.payload() else {
            return Ok(Vec::new());
        };
        composite
            .leaves
            .iter()
            .map(|variant| {
                let leaf = self.store.item_leaf(&variant.leaf_id).map_err(|e| {
                    DomainError::UpstreamFailure {
                        context: format!("item leaf {}", variant.leaf_id),
                        source: Box::new(e),
                    }
                })?;
                Ok(NodeSeed::eager()
                    .named(variant_label(&leaf, variant))
                    .payload(WikiPayload::ItemLeaf(Box::new(leaf)))
                    .strategy(DisplayStrategy::new(ItemLeafContent, DetailActions)))
            })
            .collect()
    }
}

fn variant_label(leaf: &ItemLeaf, variant: &ItemVariantRef) -> String {
    let mut label = format!("{} [{}]", leaf.name, variant.difference);
    if variant.has_dye {
        label.push_str(" [Dye]");
    }
    label
}

// ------------------------------------------------------------
// Renderers
// ------------------------------------------------------------

/// One page of the result list: numbered composite names.
struct ItemResultsContent {
    page_size: usize,
}

impl ContentRenderer<WikiPayload> for ItemResultsContent {
    fn content(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Content> {
        let offset = page_offset(tree, node, self.page_size);
        let (index, count) = tree.sibling_position(node).unwrap_or((0, 1));
        let children = tree.get(node).map(|n| n.children()).unwrap_or_default();
        let body = children
            .iter()
            .enumerate()
            .map(|(i, &child)| {
                format!(
                    "> {}. {}",
                    offset + i,
                    tree.get(child).map(|n| n.label()).unwrap_or_default()
                )
            })
            .join("\n");
        Ok(Content::new(body)
            .titled("Results")
            .with_footer(format!("Page {}/{}", index + 1, count)))
    }
}

struct ItemResultsActions {
    page_size: usize,
}

impl ActionRenderer<WikiPayload> for ItemResultsActions {
    fn actions(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Vec<Action>> {
        let (_, count) = tree.sibling_position(node).unwrap_or((0, 1));
        let offset = page_offset(tree, node, self.page_size);
        Ok(pager_actions(count, child_select_menu(tree, node, offset)))
    }
}

/// One composite: its materialized variants, numbered from one.
struct ItemCompositeContent;

impl ContentRenderer<WikiPayload> for ItemCompositeContent {
    fn content(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Content> {
        let children = tree.get(node).map(|n| n.children()).unwrap_or_default();
        let body = children
            .iter()
            .enumerate()
            .map(|(i, &child)| {
                format!(
                    "> {}. {}",
                    i + 1,
                    tree.get(child).map(|n| n.label()).unwrap_or_default()
                )
            })
            .join("\n");
        Ok(Content::new(body)
            .titled(tree.get(node).map(|n| n.label().to_string()).unwrap_or_default()))
    }
}

/// Full detail screen of one item variant.
struct ItemLeafContent;

impl ContentRenderer<WikiPayload> for ItemLeafContent {
    fn content(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Content> {
        let Some(WikiPayload::ItemLeaf(leaf)) = tree.get(node).and_then(Node::payload) else {
            return Ok(Content::default());
        };
        Ok(Content::new(item_leaf_body(leaf))
            .titled(leaf.name.clone())
            .with_footer("Credits: coryn.club"))
    }
}

fn item_leaf_body(leaf: &ItemLeaf) -> String {
    let mut body = String::new();

    let market = &leaf.market_value;
    if market.sell.is_some() || market.process.is_some() || market.duration.is_some() {
        if let Some(sell) = market.sell {
            let _ = writeln!(body, "Sell: {sell}");
        }
        if let Some(process) = &market.process {
            let _ = writeln!(body, "Process: {process}");
        }
        if let Some(duration) = &market.duration {
            let _ = writeln!(body, "Duration: {duration}");
        }
    }

    if let Some(stats) = &leaf.stats {
        let _ = writeln!(body, "Stats:");
        for stat in stats {
            if let Some(requirement) = &stat.requirement {
                let _ = writeln!(body, "{} only:", requirement.join(", "));
            }
            for (name, value) in &stat.attributes {
                let _ = writeln!(body, "  {name} {value}");
            }
        }
    }

    if let Some(upgrades) = &leaf.upgrades {
        let into = joined_names(upgrades.upgrades_into.as_deref());
        let from = joined_names(upgrades.upgrades_from.as_deref());
        if !into.is_empty() || !from.is_empty() {
            let _ = writeln!(body, "Upgrades:\n  Into: {into}\n  From: {from}");
        }
    }

    if let Some(locations) = &leaf.location {
        let _ = writeln!(body, "Location:");
        for location in locations {
            if let Some(monster) = &location.monster {
                let _ = writeln!(body, "  Monster: {}", monster.display);
            }
            if let Some(dye) = &location.dye {
                let _ = writeln!(body, "  Dye: {dye}");
            }
            if let Some(map) = &location.map {
                let _ = writeln!(body, "  Map: {}", map.display);
            }
        }
    }

    if let Some(recipe) = &leaf.recipe {
        let _ = writeln!(body, "Recipe:");
        if let Some(fee) = recipe.fee {
            let _ = writeln!(body, "  Fee: {fee}");
        }
        let _ = writeln!(body, "  Set: {}", recipe.set);
        if let Some(level) = recipe.level {
            let _ = writeln!(body, "  Level: {level}");
        }
        let _ = writeln!(body, "  Difficulty: {}", recipe.difficulty);
        let _ = writeln!(body, "  Materials:");
        for material in &recipe.materials {
            let _ = writeln!(body, "    x{} - {}", material.amount, material.item.display);
        }
    }

    if let Some(uses) = &leaf.uses {
        let _ = writeln!(body, "Uses:");
        for group in uses {
            let _ = writeln!(body, "  {}:", group.kind);
            for item in &group.items {
                let _ = writeln!(body, "    {}", item.display);
            }
        }
    }

    body.trim_end().to_string()
}

fn joined_names(pairs: Option<&[crate::domain::entities::IdStringPair]>) -> String {
    pairs
        .map(|pairs| pairs.iter().map(|p| p.display.as_str()).join(", "))
        .unwrap_or_default()
}
