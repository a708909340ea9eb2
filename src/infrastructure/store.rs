//! JSON-file backing store with trigram-ranked search.
//!
//! The dataset is the scraper pipeline's output: composite summaries,
//! leaf detail records, and per-level leveling tables in one JSON
//! document. The whole dataset is held in memory; search runs a phrase
//! pass first and falls back to trigram ranking, mirroring the query
//! cascade of the upstream wiki database.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::entities::{
    ItemComposite, ItemLeaf, LevellingRow, LevellingTable, MonsterComposite, MonsterLeaf, RecordId,
};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::WikiStore;

/// On-disk dataset layout. All collections are optional so partial
/// datasets (items only, say) stay loadable.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiDataset {
    pub items: Vec<ItemComposite>,
    pub item_leaves: Vec<ItemLeaf>,
    pub monsters: Vec<MonsterComposite>,
    pub monster_leaves: Vec<MonsterLeaf>,
    pub levelling: Vec<LevellingTable>,
}

/// In-memory store over one loaded dataset.
pub struct JsonWikiStore {
    dataset: WikiDataset,
    item_index: TrigramIndex,
    monster_index: TrigramIndex,
    item_leaves_by_id: HashMap<RecordId, usize>,
    monster_leaves_by_id: HashMap<RecordId, usize>,
}

impl JsonWikiStore {
    /// Load a dataset file and build the search indexes.
    #[instrument(level = "debug")]
    pub fn open(path: &Path) -> InfraResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| InfraError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset: WikiDataset =
            serde_json::from_str(&content).map_err(|e| InfraError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        debug!(
            items = dataset.items.len(),
            monsters = dataset.monsters.len(),
            levels = dataset.levelling.len(),
            "dataset loaded"
        );
        Ok(Self::from_dataset(dataset))
    }

    /// The loaded dataset, for status displays.
    pub fn dataset(&self) -> &WikiDataset {
        &self.dataset
    }

    /// Build a store from an already-assembled dataset (tests, embedding).
    pub fn from_dataset(dataset: WikiDataset) -> Self {
        let item_index = TrigramIndex::build(dataset.items.iter().map(|c| c.name.as_str()));
        let monster_index = TrigramIndex::build(dataset.monsters.iter().map(|c| c.name.as_str()));
        let item_leaves_by_id = dataset
            .item_leaves
            .iter()
            .enumerate()
            .map(|(i, leaf)| (leaf.id.clone(), i))
            .collect();
        let monster_leaves_by_id = dataset
            .monster_leaves
            .iter()
            .enumerate()
            .map(|(i, leaf)| (leaf.id.clone(), i))
            .collect();
        Self {
            dataset,
            item_index,
            monster_index,
            item_leaves_by_id,
            monster_leaves_by_id,
        }
    }
}

impl WikiStore for JsonWikiStore {
    #[instrument(level = "debug", skip(self))]
    fn search_items(&self, query: &str, limit: usize) -> InfraResult<Vec<ItemComposite>> {
        let ranked = self.item_index.search(query);
        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|i| self.dataset.items[i].clone())
            .collect())
    }

    fn item_leaf(&self, id: &RecordId) -> InfraResult<ItemLeaf> {
        self.item_leaves_by_id
            .get(id)
            .map(|&i| self.dataset.item_leaves[i].clone())
            .ok_or_else(|| InfraError::MissingRecord {
                collection: "item leaf",
                id: id.clone(),
            })
    }

    #[instrument(level = "debug", skip(self))]
    fn search_monsters(&self, query: &str, limit: usize) -> InfraResult<Vec<MonsterComposite>> {
        let ranked = self.monster_index.search(query);
        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|i| self.dataset.monsters[i].clone())
            .collect())
    }

    fn monster_leaf(&self, id: &RecordId) -> InfraResult<MonsterLeaf> {
        self.monster_leaves_by_id
            .get(id)
            .map(|&i| self.dataset.monster_leaves[i].clone())
            .ok_or_else(|| InfraError::MissingRecord {
                collection: "monster leaf",
                id: id.clone(),
            })
    }

    fn levelling(&self, level: u32) -> InfraResult<Vec<LevellingRow>> {
        Ok(self
            .dataset
            .levelling
            .iter()
            .find(|table| table.level == level)
            .map(|table| table.rows.clone())
            .unwrap_or_default())
    }
}

/// Trigram index over one collection's display names.
///
/// Ranking follows the upstream query engine: rank = |query grams ∩
/// record grams| / |record grams|, matches with rank 0 dropped, ties
/// broken by name. A phrase pass (normalized substring match) runs first;
/// only when it finds nothing does trigram ranking kick in.
struct TrigramIndex {
    names: Vec<String>,
    record_grams: Vec<HashSet<String>>,
    by_gram: HashMap<String, Vec<usize>>,
}

impl TrigramIndex {
    fn build<'a>(names: impl Iterator<Item = &'a str>) -> Self {
        let names: Vec<String> = names.map(normalize).collect();
        let record_grams: Vec<HashSet<String>> = names.iter().map(|n| trigrams(n)).collect();
        let mut by_gram: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, grams) in record_grams.iter().enumerate() {
            for gram in grams {
                by_gram.entry(gram.clone()).or_default().push(i);
            }
        }
        Self {
            names,
            record_grams,
            by_gram,
        }
    }

    /// Indices of matching records, best first.
    fn search(&self, query: &str) -> Vec<usize> {
        let query = normalize(query);
        if query.is_empty() {
            return Vec::new();
        }

        // Phrase pass: the normalized query appears verbatim in the name.
        let phrase: Vec<usize> = self
            .names
            .iter()
            .positions(|name| name.contains(&query))
            .collect();
        if !phrase.is_empty() {
            return phrase
                .into_iter()
                .sorted_by(|&a, &b| self.names[a].cmp(&self.names[b]))
                .collect();
        }

        // Trigram fallback.
        let query_grams = trigrams(&query);
        let mut hits: HashMap<usize, usize> = HashMap::new();
        for gram in &query_grams {
            if let Some(records) = self.by_gram.get(gram) {
                for &record in records {
                    *hits.entry(record).or_insert(0) += 1;
                }
            }
        }
        hits.into_iter()
            .filter_map(|(record, shared)| {
                let total = self.record_grams[record].len();
                (total > 0).then(|| (record, shared as f64 / total as f64))
            })
            .sorted_by(|&(a, rank_a), &(b, rank_b)| {
                rank_b
                    .partial_cmp(&rank_a)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| self.names[a].cmp(&self.names[b]))
            })
            .map(|(record, _)| record)
            .collect()
    }
}

/// Lowercase and strip everything but letters, digits and spaces.
fn normalize(s: &str) -> String {
    // A fresh Regex per call would be wasteful; names are normalized in
    // bulk at build time and once per query afterwards.
    static PATTERN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9 ]+").expect("valid pattern"));
    let lowered = s.to_lowercase();
    pattern.replace_all(&lowered, "").trim().to_string()
}

/// Sliding character trigrams of a normalized string.
fn trigrams(s: &str) -> HashSet<String> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < 3 {
        // Short names still need to be findable by their whole string.
        return if s.is_empty() {
            HashSet::new()
        } else {
            HashSet::from([s.to_string()])
        };
    }
    chars.windows(3).map(|w| w.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_mixed_case_and_punctuation_when_normalizing_then_keeps_words() {
        assert_eq!(normalize("Dark-General's Blade!"), "darkgenerals blade");
    }

    #[test]
    fn given_short_string_when_building_trigrams_then_uses_whole_string() {
        assert_eq!(trigrams("ox"), HashSet::from(["ox".to_string()]));
    }

    #[test]
    fn given_string_when_building_trigrams_then_windows_of_three() {
        let grams = trigrams("blade");
        assert!(grams.contains("bla"));
        assert!(grams.contains("lad"));
        assert!(grams.contains("ade"));
        assert_eq!(grams.len(), 3);
    }
}
