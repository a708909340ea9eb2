//! Shared dataset fixtures for integration tests

use loreseek::domain::entities::*;
use loreseek::infrastructure::store::WikiDataset;

pub fn pair(id: &str, display: &str) -> IdStringPair {
    IdStringPair {
        id: id.to_string(),
        display: display.to_string(),
    }
}

pub fn item_leaf(id: &str, name: &str) -> ItemLeaf {
    ItemLeaf {
        id: id.to_string(),
        name: name.to_string(),
        item_type: Some("One-Handed Sword".to_string()),
        market_value: MarketValue {
            sell: Some(1200),
            process: None,
            duration: None,
        },
        image: None,
        stats: Some(vec![StatLine {
            requirement: None,
            attributes: vec![("ATK".to_string(), 12.0), ("Critical Rate".to_string(), 5.0)],
        }]),
        location: Some(vec![ItemLocation {
            monster: Some(pair("m1", "Forest Wolf")),
            dye: None,
            map: None,
        }]),
        recipe: None,
        uses: None,
        upgrades: None,
    }
}

pub fn item_composite(id: &str, name: &str, leaf_ids: &[&str]) -> ItemComposite {
    ItemComposite {
        id: id.to_string(),
        name: name.to_string(),
        leaves: leaf_ids
            .iter()
            .enumerate()
            .map(|(i, leaf_id)| ItemVariantRef {
                leaf_id: leaf_id.to_string(),
                difference: format!("Lv {}", 100 + i * 10),
                has_dye: i == 0,
            })
            .collect(),
    }
}

pub fn monster_leaf(id: &str, name: &str, level: u32) -> MonsterLeaf {
    MonsterLeaf {
        id: id.to_string(),
        name: name.to_string(),
        level,
        difficulty: Some("Normal".to_string()),
        hp: Some(50_000),
        element: Some("Fire".to_string()),
        exp: Some(12_000),
        tamable: false,
        location: pair("map1", "Scorched Plains"),
        drops: vec![MonsterDrop {
            item_type: "Material".to_string(),
            name: pair("i1", "Wolf Fang"),
            dye: Some("35".to_string()),
        }],
        image: None,
    }
}

pub fn monster_composite(id: &str, name: &str, leaf_ids: &[&str]) -> MonsterComposite {
    MonsterComposite {
        id: id.to_string(),
        name: name.to_string(),
        location: pair("map1", "Scorched Plains"),
        leaves: leaf_ids
            .iter()
            .enumerate()
            .map(|(i, leaf_id)| MonsterVariantRef {
                leaf_id: leaf_id.to_string(),
                level: 100 + (i as u32) * 20,
                difficulty: Some(if i == 0 { "Normal" } else { "Hard" }.to_string()),
            })
            .collect(),
    }
}

pub fn levelling_row(mob_type: &str, name: &str, level: u32) -> LevellingRow {
    LevellingRow {
        mob_type: mob_type.to_string(),
        mob_level: level,
        mob: pair("m1", name),
        location: "Sunken Cave".to_string(),
        exp_brackets: vec![ExpBracket {
            exp: 1_234_567,
            break_status: Some("No".to_string()),
            exp_progress: 3.5,
        }],
    }
}

/// Seven sword items (two result pages at the default page size), two
/// monsters, and one leveling table.
pub fn sample_dataset() -> WikiDataset {
    let item_names = [
        "Bronze Sword",
        "Iron Sword",
        "Steel Sword",
        "Mithril Sword",
        "Orichalcum Sword",
        "Crimson Sword",
        "Azure Sword",
    ];
    let mut items = Vec::new();
    let mut item_leaves = Vec::new();
    for (i, name) in item_names.iter().enumerate() {
        let leaf_a = format!("il{i}a");
        let leaf_b = format!("il{i}b");
        items.push(item_composite(&format!("ic{i}"), name, &[&leaf_a, &leaf_b]));
        item_leaves.push(item_leaf(&leaf_a, name));
        item_leaves.push(item_leaf(&leaf_b, name));
    }

    WikiDataset {
        items,
        item_leaves,
        monsters: vec![
            monster_composite("mc0", "Forest Wolf", &["ml0"]),
            monster_composite("mc1", "Dire Wolf", &["ml1", "ml2"]),
        ],
        monster_leaves: vec![
            monster_leaf("ml0", "Forest Wolf", 30),
            monster_leaf("ml1", "Dire Wolf", 100),
            monster_leaf("ml2", "Dire Wolf", 120),
        ],
        levelling: vec![LevellingTable {
            level: 150,
            rows: vec![
                levelling_row("Boss", "Ancient Empress", 155),
                levelling_row("Normal Monsters", "Lava Imp", 148),
                levelling_row("Normal Monsters", "Magma Slime", 152),
                levelling_row("Mini Boss", "Flame Warden", 150),
            ],
        }],
    }
}
