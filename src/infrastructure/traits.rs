//! I/O boundary traits for testability
//!
//! These traits abstract external I/O, allowing services to be tested
//! with in-memory implementations.

use crate::domain::entities::{
    ItemComposite, ItemLeaf, LevellingRow, MonsterComposite, MonsterLeaf, RecordId,
};
use crate::infrastructure::error::InfraResult;

/// Read-only backing store of scraped wiki records.
///
/// Search calls return ranked composite summaries; leaf calls fetch one
/// full detail record and are what Promise-node generators invoke on
/// descent. Implementations must be cheap to share (`Arc`) and safe to
/// call from independent sessions concurrently.
pub trait WikiStore: Send + Sync {
    /// Ranked item composites matching `query`, at most `limit`.
    /// An empty result means no match; it is not an error.
    fn search_items(&self, query: &str, limit: usize) -> InfraResult<Vec<ItemComposite>>;

    /// Full item detail record by id.
    fn item_leaf(&self, id: &RecordId) -> InfraResult<ItemLeaf>;

    /// Ranked monster composites matching `query`, at most `limit`.
    fn search_monsters(&self, query: &str, limit: usize) -> InfraResult<Vec<MonsterComposite>>;

    /// Full monster detail record by id.
    fn monster_leaf(&self, id: &RecordId) -> InfraResult<MonsterLeaf>;

    /// Leveling rows for one character level. Empty when the level is
    /// not covered by the dataset.
    fn levelling(&self, level: u32) -> InfraResult<Vec<LevellingRow>>;
}

/// Item for FZF-style selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    /// Display text shown in the picker
    pub display: String,
    /// Actual value (e.g., a node selector)
    pub value: String,
}

/// Interactive FZF-style picker abstraction.
pub trait Picker: Send + Sync {
    /// Present items to the user and return the selected one.
    /// Returns None if the user cancels (Esc/Ctrl-C).
    fn pick_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real picker implementation using skim (FZF-like).
#[derive(Debug, Default)]
pub struct SkimPicker;

impl Picker for SkimPicker {
    fn pick_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        use skim::prelude::*;
        use std::io::Cursor;

        if items.is_empty() {
            return Ok(None);
        }

        let input = items
            .iter()
            .map(|i| i.display.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let options = SkimOptionsBuilder::default()
            .prompt(Some(prompt))
            .height(Some("50%"))
            .multi(false)
            .build()
            .map_err(|e| format!("failed to build skim options: {e}"))?;

        let item_reader = SkimItemReader::default();
        let items_arc = item_reader.of_bufread(Cursor::new(input));

        let output = Skim::run_with(&options, Some(items_arc));

        match output {
            Some(out) if out.is_abort => Ok(None),
            Some(out) => {
                if let Some(selected) = out.selected_items.first() {
                    let display = selected.output().to_string();
                    // Find the matching item
                    let item = items.iter().find(|i| i.display == display).cloned();
                    Ok(item)
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }
}
