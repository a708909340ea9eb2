//! Domain entities: wiki record types
//!
//! Composite records are what search matches; leaf records carry the full
//! detail and are fetched lazily when the user drills into a composite.

use serde::{Deserialize, Serialize};

/// Backing-store record id (hex object id in scraped datasets).
pub type RecordId = String;

/// Cross-reference to another record plus its display string, so screens
/// can show a name without another store round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdStringPair {
    pub id: RecordId,
    pub display: String,
}

// ------------------------------------------------------------
// Items
// ------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketValue {
    pub sell: Option<i64>,
    pub process: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub amount: u32,
    pub item: IdStringPair,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub fee: Option<i64>,
    pub set: i64,
    pub level: Option<u32>,
    pub difficulty: i64,
    pub materials: Vec<Material>,
}

/// Where an item drops: from a monster, a dye slot, or a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemLocation {
    pub monster: Option<IdStringPair>,
    pub dye: Option<String>,
    pub map: Option<IdStringPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub items: Vec<IdStringPair>,
}

/// One stat block; `requirement` limits it to certain builds
/// ("Heavy Armor only:").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub requirement: Option<Vec<String>>,
    pub attributes: Vec<(String, f64)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Upgrades {
    #[serde(rename = "from")]
    pub upgrades_from: Option<Vec<IdStringPair>>,
    #[serde(rename = "into")]
    pub upgrades_into: Option<Vec<IdStringPair>>,
}

/// Full item detail record, fetched on descent into a composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemLeaf {
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub market_value: MarketValue,
    pub image: Option<String>,
    pub stats: Option<Vec<StatLine>>,
    pub location: Option<Vec<ItemLocation>>,
    pub recipe: Option<Recipe>,
    pub uses: Option<Vec<UseGroup>>,
    pub upgrades: Option<Upgrades>,
}

/// Lightweight reference from a composite to one of its variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemVariantRef {
    pub leaf_id: RecordId,
    /// What distinguishes this variant within the composite ("Lv 220").
    pub difference: String,
    pub has_dye: bool,
}

/// Search-facing item record: one display name grouping its variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemComposite {
    pub id: RecordId,
    pub name: String,
    pub leaves: Vec<ItemVariantRef>,
}

// ------------------------------------------------------------
// Monsters
// ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterDrop {
    #[serde(rename = "type")]
    pub item_type: String,
    pub name: IdStringPair,
    pub dye: Option<String>,
}

/// Full monster detail record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterLeaf {
    pub id: RecordId,
    pub name: String,
    pub level: u32,
    pub difficulty: Option<String>,
    pub hp: Option<u64>,
    pub element: Option<String>,
    pub exp: Option<u64>,
    pub tamable: bool,
    pub location: IdStringPair,
    pub drops: Vec<MonsterDrop>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterVariantRef {
    pub leaf_id: RecordId,
    pub level: u32,
    pub difficulty: Option<String>,
}

/// Search-facing monster record: one spawn grouping its difficulties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterComposite {
    pub id: RecordId,
    pub name: String,
    pub location: IdStringPair,
    pub leaves: Vec<MonsterVariantRef>,
}

// ------------------------------------------------------------
// Leveling
// ------------------------------------------------------------

/// EXP earned from one mob at one character-level bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpBracket {
    pub exp: u64,
    pub break_status: Option<String>,
    pub exp_progress: f64,
}

/// One leveling-table row: a mob worth fighting at the queried level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevellingRow {
    pub mob_type: String,
    pub mob_level: u32,
    pub mob: IdStringPair,
    pub location: String,
    pub exp_brackets: Vec<ExpBracket>,
}

/// All leveling rows for one character level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevellingTable {
    pub level: u32,
    pub rows: Vec<LevellingRow>,
}
