//! Tests for cursor navigation over eager trees

use loreseek::domain::tree::{NodeSeed, PageTree, Selector};
use loreseek::domain::{Controller, DomainError};

/// Root with four named children.
fn four_children() -> PageTree<&'static str> {
    PageTree::new(
        NodeSeed::eager()
            .named("root")
            .children(["a", "b", "c", "d"].map(|name| NodeSeed::eager().named(name))),
    )
}

fn current_name<'a>(controller: &'a Controller<&'static str>) -> &'a str {
    controller.current_node().label()
}

// ============================================================
// Sibling Clamping Tests
// ============================================================

#[test]
fn given_four_siblings_when_moving_right_past_the_end_then_clamps_at_last() {
    let mut controller = Controller::new(four_children()).unwrap();
    controller.goto_child(Selector::Name("a")).unwrap();

    // k + 5 moves from index 0 must end at index k - 1, never past it
    for _ in 0..9 {
        controller.goto_next_sibling();
    }
    assert_eq!(current_name(&controller), "d");
}

#[test]
fn given_four_siblings_when_moving_left_past_the_start_then_clamps_at_first() {
    let mut controller = Controller::new(four_children()).unwrap();
    controller.goto_child(Selector::Name("d")).unwrap();

    for _ in 0..9 {
        controller.goto_previous_sibling();
    }
    assert_eq!(current_name(&controller), "a");
}

#[test]
fn given_middle_sibling_when_jumping_first_and_last_then_lands_on_bounds() {
    let mut controller = Controller::new(four_children()).unwrap();
    controller.goto_child(Selector::Name("b")).unwrap();

    controller.goto_last_sibling();
    assert_eq!(current_name(&controller), "d");

    controller.goto_first_sibling();
    assert_eq!(current_name(&controller), "a");
}

// ============================================================
// Root Boundary Tests
// ============================================================

#[test]
fn given_cursor_at_root_when_moving_siblings_then_nothing_happens() {
    let mut controller = Controller::new(four_children()).unwrap();

    controller.goto_first_sibling();
    controller.goto_last_sibling();
    controller.goto_next_sibling();
    controller.goto_previous_sibling();
    controller.goto_parent();

    assert_eq!(current_name(&controller), "root");
}

// ============================================================
// Parent/Child Round-Trip Tests
// ============================================================

#[test]
fn given_child_id_when_looking_up_then_returns_that_child_with_back_reference() {
    let tree = four_children();
    let root = tree.root();
    let child = tree.get(root).unwrap().children()[1];

    let found = tree.find_child(root, Selector::Id(child)).unwrap();
    assert_eq!(found, child);
    assert_eq!(tree.get(found).unwrap().parent(), Some(root));
}

#[test]
fn given_nested_tree_when_descending_and_ascending_then_returns_to_root() {
    let mut controller = Controller::new(four_children()).unwrap();
    controller.goto_child(Selector::Name("c")).unwrap();
    assert_eq!(current_name(&controller), "c");

    controller.goto_parent();
    assert_eq!(current_name(&controller), "root");
}

// ============================================================
// Selector Tests
// ============================================================

#[test]
fn given_unknown_name_when_descending_then_not_found_is_raised() {
    let mut controller = Controller::new(four_children()).unwrap();

    let result = controller.goto_child(Selector::Name("nope"));
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
    // and the cursor did not move
    assert_eq!(current_name(&controller), "root");
}

#[test]
fn given_duplicate_names_when_looking_up_by_name_then_first_match_wins() {
    let tree = PageTree::new(
        NodeSeed::eager()
            .named("root")
            .child(NodeSeed::eager().named("twin").payload("first"))
            .child(NodeSeed::eager().named("twin").payload("second")),
    );
    let root = tree.root();

    let found = tree.find_child(root, Selector::Name("twin")).unwrap();
    assert_eq!(tree.get(found).unwrap().payload(), Some(&"first"));
}

#[test]
fn given_grandchild_id_when_looking_up_from_root_then_not_found() {
    // Lookup is structural: only direct children match.
    let tree: PageTree<&str> = PageTree::new(
        NodeSeed::eager()
            .named("root")
            .child(NodeSeed::eager().named("child").child(NodeSeed::eager().named("grandchild"))),
    );
    let root = tree.root();
    let child = tree.get(root).unwrap().children()[0];
    let grandchild = tree.get(child).unwrap().children()[0];

    let result = tree.find_child(root, Selector::Id(grandchild));
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

// ============================================================
// Tree Structure Tests
// ============================================================

#[test]
fn given_seeded_tree_when_planting_then_sibling_order_is_insertion_order() {
    let tree = four_children();
    let names: Vec<_> = tree
        .get(tree.root())
        .unwrap()
        .children()
        .iter()
        .map(|&c| tree.get(c).unwrap().label().to_string())
        .collect();
    assert_eq!(names, ["a", "b", "c", "d"]);
}

#[test]
fn given_tree_when_iterating_then_visits_all_nodes_depth_first() {
    let tree = four_children();
    let labels: Vec<_> = tree.iter().map(|(_, node)| node.label().to_string()).collect();
    assert_eq!(labels, ["root", "a", "b", "c", "d"]);
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.depth(), 2);
}

#[test]
fn given_node_when_asking_sibling_position_then_reports_index_and_count() {
    let tree = four_children();
    let third = tree.get(tree.root()).unwrap().children()[2];
    assert_eq!(tree.sibling_position(third), Some((2, 4)));
    assert_eq!(tree.sibling_position(tree.root()), None);
}
