//! Tests for the JSON store: search cascade, record lookup, dataset loading

mod common;

use rstest::{fixture, rstest};
use std::io::Write;

use loreseek::infrastructure::error::InfraError;
use loreseek::infrastructure::store::JsonWikiStore;
use loreseek::infrastructure::traits::WikiStore;

#[fixture]
fn store() -> JsonWikiStore {
    JsonWikiStore::from_dataset(common::sample_dataset())
}

// ============================================================
// Search Cascade Tests
// ============================================================

#[rstest]
fn given_exact_name_when_searching_then_phrase_match_ranks_first(store: JsonWikiStore) {
    let results = store.search_items("iron sword", 25).unwrap();
    assert!(!results.is_empty());
    assert_eq!(results[0].name, "Iron Sword");
}

#[rstest]
fn given_shared_word_when_searching_then_all_phrase_matches_sorted_by_name(store: JsonWikiStore) {
    let results = store.search_items("sword", 25).unwrap();
    assert_eq!(results.len(), 7);
    let names: Vec<_> = results.iter().map(|c| c.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[rstest]
fn given_misspelled_query_when_searching_then_trigram_fallback_finds_it(store: JsonWikiStore) {
    // no phrase match for the typo, trigram ranking still lands on it
    let results = store.search_items("mithril swrd", 25).unwrap();
    assert!(!results.is_empty());
    assert_eq!(results[0].name, "Mithril Sword");
}

#[rstest]
fn given_limit_when_searching_then_result_count_is_capped(store: JsonWikiStore) {
    let results = store.search_items("sword", 3).unwrap();
    assert_eq!(results.len(), 3);
}

#[rstest]
fn given_nonsense_query_when_searching_then_no_results(store: JsonWikiStore) {
    let results = store.search_items("qqqqxxxx", 25).unwrap();
    assert!(results.is_empty());
}

#[rstest]
fn given_monster_name_when_searching_monsters_then_found(store: JsonWikiStore) {
    let results = store.search_monsters("dire wolf", 25).unwrap();
    assert_eq!(results[0].name, "Dire Wolf");
}

// ============================================================
// Record Lookup Tests
// ============================================================

#[rstest]
fn given_known_leaf_id_when_fetching_then_returns_the_record(store: JsonWikiStore) {
    let leaf = store.item_leaf(&"il0a".to_string()).unwrap();
    assert_eq!(leaf.name, "Bronze Sword");
}

#[rstest]
fn given_unknown_leaf_id_when_fetching_then_missing_record_error(store: JsonWikiStore) {
    let result = store.item_leaf(&"nope".to_string());
    assert!(matches!(
        result,
        Err(InfraError::MissingRecord { id, .. }) if id == "nope"
    ));
}

#[rstest]
fn given_covered_level_when_looking_up_levelling_then_returns_rows(store: JsonWikiStore) {
    let rows = store.levelling(150).unwrap();
    assert_eq!(rows.len(), 4);
}

#[rstest]
fn given_uncovered_level_when_looking_up_levelling_then_empty(store: JsonWikiStore) {
    let rows = store.levelling(999).unwrap();
    assert!(rows.is_empty());
}

// ============================================================
// Dataset Loading Tests
// ============================================================

#[test]
fn given_dataset_file_when_opening_then_store_is_searchable() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let json = serde_json::to_string(&common::sample_dataset()).unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let store = JsonWikiStore::open(file.path()).unwrap();
    let results = store.search_items("sword", 25).unwrap();
    assert_eq!(results.len(), 7);
}

#[test]
fn given_malformed_file_when_opening_then_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();

    let result = JsonWikiStore::open(file.path());
    assert!(matches!(result, Err(InfraError::Parse { .. })));
}

#[test]
fn given_missing_file_when_opening_then_io_error() {
    let result = JsonWikiStore::open(std::path::Path::new("/nonexistent/wiki.json"));
    assert!(matches!(result, Err(InfraError::Io { .. })));
}
