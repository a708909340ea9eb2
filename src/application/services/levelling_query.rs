//! Leveling query service
//!
//! Looks up the leveling table for one character level and builds a tree
//! grouped by mob class (normal monsters, then mini bosses, then bosses).
//! Class nodes auto-descend onto their first page of spots.

use std::fmt::Write as _;
use std::sync::Arc;

use itertools::Itertools;
use tracing::instrument;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::{WikiPayload, WikiTree};
use crate::domain::display::{
    Action, ActionRenderer, Content, ContentRenderer, DisplayStrategy, SelectMenu, SelectOption,
};
use crate::domain::error::DomainResult;
use crate::domain::tree::{EnterHook, Node, NodeId, NodeSeed, PageTree};
use crate::infrastructure::traits::WikiStore;

/// Builds browsable leveling-spot trees for one character level.
pub struct LevellingQueryService {
    store: Arc<dyn WikiStore>,
    page_size: usize,
}

impl LevellingQueryService {
    pub fn new(store: Arc<dyn WikiStore>, page_size: usize) -> Self {
        Self { store, page_size }
    }

    /// Shape: root, then mob-class nodes (auto-descend), then paginated
    /// spot screens. Everything is eager; the store is read once up front.
    #[instrument(level = "debug", skip(self))]
    pub fn lookup(&self, level: u32) -> ApplicationResult<WikiTree> {
        let rows = self
            .store
            .levelling(level)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("leveling table for level {level}"),
                source: Box::new(e),
            })?;
        if rows.is_empty() {
            return Err(ApplicationError::NoMatches {
                query: format!("level {level}"),
            });
        }

        let by_class = rows
            .into_iter()
            .map(|row| (row.mob_type.clone(), row))
            .into_group_map();

        let classes = by_class
            .into_iter()
            .sorted_by_key(|(class, _)| class_rank(class))
            .map(|(class, rows)| {
                let row_chunks = rows.into_iter().chunks(self.page_size);
                let pages = row_chunks.into_iter().map(|chunk| {
                    NodeSeed::eager()
                        .payload(WikiPayload::LevellingSpots(chunk.collect()))
                        .strategy(DisplayStrategy::new(SpotsContent, SpotsActions))
                });
                NodeSeed::eager()
                    .named(class)
                    .on_enter(EnterHook::DescendFirst)
                    .strategy(DisplayStrategy::new(ClassContent, ClassActions))
                    .children(pages.collect::<Vec<_>>())
            })
            .collect::<Vec<_>>();

        let root = NodeSeed::eager()
            .named(format!("leveling: lv {level}"))
            .strategy(DisplayStrategy::new(LevellingRootContent, LevellingRootActions))
            .children(classes);
        Ok(PageTree::new(root))
    }
}

/// Browse order of mob classes, weakest group first.
fn class_rank(class: &str) -> u8 {
    match class.to_lowercase().as_str() {
        "normal monsters" => 0,
        "mini boss" => 1,
        "boss" => 2,
        _ => 3,
    }
}

fn spots_in(tree: &WikiTree, node: NodeId) -> usize {
    match tree.get(node).and_then(Node::payload) {
        Some(WikiPayload::LevellingSpots(rows)) => rows.len(),
        _ => 0,
    }
}

// ------------------------------------------------------------
// Renderers
// ------------------------------------------------------------

/// Per-class mob counts.
struct LevellingRootContent;

impl ContentRenderer<WikiPayload> for LevellingRootContent {
    fn content(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Content> {
        let classes = tree.get(node).map(|n| n.children()).unwrap_or_default();
        let body = classes
            .iter()
            .map(|&class| {
                let label = tree.get(class).map(|n| n.label()).unwrap_or_default();
                let mobs: usize = tree
                    .get(class)
                    .map(|n| n.children().iter().map(|&page| spots_in(tree, page)).sum())
                    .unwrap_or(0);
                format!("{label}: {mobs} mobs")
            })
            .join("\n");
        Ok(Content::new(body)
            .titled(tree.get(node).map(|n| n.label().to_string()).unwrap_or_default()))
    }
}

struct LevellingRootActions;

impl ActionRenderer<WikiPayload> for LevellingRootActions {
    fn actions(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Vec<Action>> {
        let classes = tree.get(node).map(|n| n.children()).unwrap_or_default();
        let options = classes
            .iter()
            .map(|&class| SelectOption {
                label: tree.get(class).map(|n| n.label().to_string()).unwrap_or_default(),
                target: class,
            })
            .collect();
        Ok(vec![Action::Select(SelectMenu {
            placeholder: "More Information...".to_string(),
            options,
        })])
    }
}

/// Class overview; normally skipped by the class's auto-descend.
struct ClassContent;

impl ContentRenderer<WikiPayload> for ClassContent {
    fn content(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Content> {
        let pages = tree.get(node).map(|n| n.children()).unwrap_or_default();
        let spots: usize = pages.iter().map(|&page| spots_in(tree, page)).sum();
        Ok(Content::new(format!("{spots} spots across {} pages", pages.len()))
            .titled(tree.get(node).map(|n| n.label().to_string()).unwrap_or_default()))
    }
}

struct ClassActions;

impl ActionRenderer<WikiPayload> for ClassActions {
    fn actions(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Vec<Action>> {
        let pages = tree.get(node).map(|n| n.children()).unwrap_or_default();
        let options = pages
            .iter()
            .enumerate()
            .map(|(i, &page)| SelectOption {
                label: format!("Page {}", i + 1),
                target: page,
            })
            .collect();
        Ok(vec![
            Action::Back,
            Action::Select(SelectMenu {
                placeholder: "Open page...".to_string(),
                options,
            }),
        ])
    }
}

/// One page of leveling spots with EXP breakdowns.
struct SpotsContent;

impl ContentRenderer<WikiPayload> for SpotsContent {
    fn content(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Content> {
        let Some(WikiPayload::LevellingSpots(rows)) = tree.get(node).and_then(Node::payload) else {
            return Ok(Content::default());
        };
        let title = tree
            .get(node)
            .and_then(Node::parent)
            .and_then(|parent| tree.get(parent))
            .map(|parent| parent.label().to_string())
            .unwrap_or_default();
        let mut body = String::new();
        for row in rows {
            let _ = writeln!(body, "{} (Lv {})", row.mob.display, row.mob_level);
            let _ = writeln!(body, "  Location: {}", row.location);
            let _ = writeln!(body, "  Experience Earned:");
            for bracket in &row.exp_brackets {
                let _ = writeln!(
                    body,
                    "    {} (Break: {}) - {}%",
                    group_digits(bracket.exp),
                    bracket.break_status.as_deref().unwrap_or("-"),
                    bracket.exp_progress
                );
            }
        }
        Ok(Content::new(body.trim_end().to_string()).titled(title))
    }
}

struct SpotsActions;

impl ActionRenderer<WikiPayload> for SpotsActions {
    fn actions(&self, tree: &WikiTree, node: NodeId) -> DomainResult<Vec<Action>> {
        let (_, count) = tree.sibling_position(node).unwrap_or((0, 1));
        Ok(match count {
            0 | 1 => vec![Action::BackTwice],
            2 => vec![Action::BackTwice, Action::Previous, Action::Next],
            _ => vec![
                Action::BackTwice,
                Action::Previous,
                Action::Next,
                Action::First,
                Action::Last,
            ],
        })
    }
}

/// Thousands-separated integer for EXP figures.
fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
