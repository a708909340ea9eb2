//! Tests for promise materialization: lazy generation, eviction on exit,
//! cache freshness

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use loreseek::domain::tree::{
    ChildSource, EnterHook, Node, NodeId, NodeSeed, PageTree, Selector,
};
use loreseek::domain::{Controller, DomainError, DomainResult};

/// Generates `fanout` leaves and counts its invocations.
struct CountingSource {
    calls: Arc<AtomicUsize>,
    fanout: usize,
}

impl ChildSource<&'static str> for CountingSource {
    fn generate(&self, _placeholder: &Node<&'static str>) -> DomainResult<Vec<NodeSeed<&'static str>>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok((0..self.fanout)
            .map(|i| NodeSeed::eager().named(format!("leaf {call}.{i}")))
            .collect())
    }
}

/// Always fails, standing in for a dead backing store.
struct FailingSource;

impl ChildSource<&'static str> for FailingSource {
    fn generate(&self, _placeholder: &Node<&'static str>) -> DomainResult<Vec<NodeSeed<&'static str>>> {
        Err(DomainError::UpstreamFailure {
            context: "detail record".to_string(),
            source: Box::new(std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout")),
        })
    }
}

/// Root with two promise children A (3 leaves) and B (2 leaves).
fn promise_tree(calls_a: Arc<AtomicUsize>) -> PageTree<&'static str> {
    PageTree::new(
        NodeSeed::eager()
            .named("root")
            .child(
                NodeSeed::promise(CountingSource {
                    calls: calls_a,
                    fanout: 3,
                })
                .named("A"),
            )
            .child(
                NodeSeed::promise(CountingSource {
                    calls: Arc::new(AtomicUsize::new(0)),
                    fanout: 2,
                })
                .named("B"),
            ),
    )
}

fn children_of(controller: &Controller<&'static str>, id: NodeId) -> usize {
    controller.tree().get(id).unwrap().children().len()
}

// ============================================================
// Materialization Tests
// ============================================================

#[test]
fn given_promise_child_when_descending_then_generator_runs_once_and_children_appear() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut controller = Controller::new(promise_tree(Arc::clone(&calls))).unwrap();

    controller.goto_child(Selector::Name("A")).unwrap();

    assert_eq!(controller.current_node().label(), "A");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.current_node().children().len(), 3);
}

#[test]
fn given_materialized_node_when_descending_into_leaf_then_no_regeneration() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut controller = Controller::new(promise_tree(Arc::clone(&calls))).unwrap();
    controller.goto_child(Selector::Name("A")).unwrap();

    let leaf = controller.current_node().children()[1];
    controller.goto_child(Selector::Id(leaf)).unwrap();
    assert_eq!(controller.current_node().label(), "leaf 1.1");

    // moving within the materialized subtree must not re-run the generator
    controller.goto_parent();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// ============================================================
// Eviction / Freshness Tests
// ============================================================

#[test]
fn given_materialized_promise_when_leaving_toward_parent_then_children_are_evicted() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut controller = Controller::new(promise_tree(Arc::clone(&calls))).unwrap();
    controller.goto_child(Selector::Name("A")).unwrap();
    let a = controller.current();
    assert_eq!(children_of(&controller, a), 3);

    controller.goto_parent();

    assert_eq!(controller.current_node().label(), "root");
    assert_eq!(children_of(&controller, a), 0);
}

#[test]
fn given_evicted_promise_when_revisiting_then_children_are_rebuilt_fresh() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut controller = Controller::new(promise_tree(Arc::clone(&calls))).unwrap();

    controller.goto_child(Selector::Name("A")).unwrap();
    let first_visit: Vec<NodeId> = controller.current_node().children().to_vec();
    controller.goto_parent();
    controller.goto_child(Selector::Name("A")).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let second_visit: Vec<NodeId> = controller.current_node().children().to_vec();
    assert_eq!(second_visit.len(), 3);
    // fresh arena slots, not the evicted ones
    for id in &second_visit {
        assert!(!first_visit.contains(id));
    }
}

#[test]
fn given_evicted_children_when_looking_up_a_stale_id_then_not_found() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut controller = Controller::new(promise_tree(Arc::clone(&calls))).unwrap();

    controller.goto_child(Selector::Name("A")).unwrap();
    let stale = controller.current_node().children()[0];
    controller.goto_parent();
    controller.goto_child(Selector::Name("A")).unwrap();

    let result = controller.goto_child(Selector::Id(stale));
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

// ============================================================
// End-To-End Drill-Down
// ============================================================

#[test]
fn given_two_level_promise_tree_when_drilling_down_and_back_then_regenerates() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut controller = Controller::new(promise_tree(Arc::clone(&calls))).unwrap();

    controller.goto_child(Selector::Name("A")).unwrap();
    assert_eq!(controller.current_node().label(), "A");
    assert_eq!(controller.current_node().children().len(), 3);

    let leaf = controller.current_node().children()[1];
    controller.goto_child(Selector::Id(leaf)).unwrap();
    assert_eq!(controller.current_node().label(), "leaf 1.1");

    controller.goto_parent();
    controller.goto_parent();
    assert_eq!(controller.current_node().label(), "root");

    controller.goto_child(Selector::Name("A")).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(controller.current_node().children().len(), 3);
}

// ============================================================
// Failure Tests
// ============================================================

#[test]
fn given_failing_generator_when_descending_then_cursor_stays_and_session_survives() {
    let tree = PageTree::new(
        NodeSeed::eager()
            .named("root")
            .child(NodeSeed::promise(FailingSource).named("broken"))
            .child(NodeSeed::eager().named("fine")),
    );
    let mut controller = Controller::new(tree).unwrap();

    let result = controller.goto_child(Selector::Name("broken"));
    assert!(matches!(result, Err(DomainError::UpstreamFailure { .. })));
    assert_eq!(controller.current_node().label(), "root");

    // nothing was planted under the broken node
    let broken = controller
        .tree()
        .find_child(controller.current(), Selector::Name("broken"))
        .unwrap();
    assert_eq!(controller.tree().get(broken).unwrap().children().len(), 0);

    // the session is still navigable
    controller.goto_child(Selector::Name("fine")).unwrap();
    assert_eq!(controller.current_node().label(), "fine");
}

// ============================================================
// Enter Hook Tests
// ============================================================

#[test]
fn given_single_child_root_with_hook_when_creating_controller_then_auto_descends() {
    let calls = Arc::new(AtomicUsize::new(0));
    let tree = PageTree::new(
        NodeSeed::eager()
            .named("root")
            .on_enter(EnterHook::DescendIfOnlyChild)
            .child(
                NodeSeed::promise(CountingSource {
                    calls: Arc::clone(&calls),
                    fanout: 2,
                })
                .named("only"),
            ),
    );

    let controller = Controller::new(tree).unwrap();

    // never shows the empty intermediate screen
    assert_eq!(controller.current_node().label(), "only");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.current_node().children().len(), 2);
}

#[test]
fn given_multi_child_root_with_only_child_hook_when_creating_then_stays_on_root() {
    let tree: PageTree<&str> = PageTree::new(
        NodeSeed::eager()
            .named("root")
            .on_enter(EnterHook::DescendIfOnlyChild)
            .child(NodeSeed::eager().named("a"))
            .child(NodeSeed::eager().named("b")),
    );

    let controller = Controller::new(tree).unwrap();
    assert_eq!(controller.current_node().label(), "root");
}

#[test]
fn given_descend_first_hook_when_creating_then_lands_on_first_child() {
    let tree: PageTree<&str> = PageTree::new(
        NodeSeed::eager()
            .named("root")
            .on_enter(EnterHook::DescendFirst)
            .child(NodeSeed::eager().named("page 1"))
            .child(NodeSeed::eager().named("page 2")),
    );

    let controller = Controller::new(tree).unwrap();
    assert_eq!(controller.current_node().label(), "page 1");
}
