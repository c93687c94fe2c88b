use arboriter_pomcp::{
    config::BestChildCriteria, ChildSlot, Particles, QNode, RootNode, VNode,
};

type Node = VNode<u8, char, u8>;

fn leaf(particles: Vec<u8>) -> Node {
    VNode::new(0, 0.0, particles.into())
}

// Builds a root with action 'a' leading to a frontier child (observation 0)
// and an expanded child (observation 1), plus an action 'b' without children.
fn sample_tree() -> Node {
    let mut root = leaf(vec![1, 2, 3]);

    let mut expanded = leaf(vec![4]);
    expanded.children.push(QNode::new('c', 1, 0.5));

    let mut a = QNode::new('a', 3, 1.0);
    a.children.push((0, leaf(vec![5, 5])));
    a.children.push((1, expanded));

    root.children.push(a);
    root.children.push(QNode::new('b', 1, 0.0));
    root.visits = 4;
    root
}

#[test]
fn test_child_slot_classification() {
    let root = sample_tree();

    match root.child_slot(&'a', &0) {
        ChildSlot::Frontier(node) => assert_eq!(node.belief.len(), 2),
        other => panic!("Expected a frontier slot, got {:?}", other),
    }
    match root.child_slot(&'a', &1) {
        ChildSlot::Expanded(node) => assert_eq!(node.children.len(), 1),
        other => panic!("Expected an expanded slot, got {:?}", other),
    }

    // Known action, unseen observation
    assert!(matches!(root.child_slot(&'a', &7), ChildSlot::Unsampled));
    // Action without any observation child
    assert!(matches!(root.child_slot(&'b', &0), ChildSlot::Unsampled));
    // Action that was never expanded
    assert!(matches!(root.child_slot(&'z', &0), ChildSlot::Unsampled));
    assert!(root.child_slot(&'z', &0).node().is_none());
}

#[test]
fn test_take_child_detaches_subtree() {
    let mut root = sample_tree();

    let child = root.take_child(&'a', &1).unwrap();
    assert_eq!(child.belief, Particles::from(vec![4]));
    assert_eq!(child.children.len(), 1);

    assert!(root.qnode(&'a').unwrap().child(&1).is_none());
    assert!(root.qnode(&'a').unwrap().child(&0).is_some());
    assert!(root.take_child(&'a', &1).is_none());
    assert!(root.take_child(&'z', &0).is_none());
}

#[test]
fn test_from_subtree_preserves_node() {
    let mut root = sample_tree();
    let mut child = root.take_child(&'a', &1).unwrap();
    child.visits = 12;
    child.value = 2.5;

    let history = vec![('a', 1)];
    let promoted = RootNode::from_subtree(child, history.clone());

    assert_eq!(promoted.history, history);
    assert_eq!(promoted.visits, 12);
    assert_eq!(promoted.value, 2.5);
    assert_eq!(promoted.belief, Particles::from(vec![4]));
    assert_eq!(promoted.children.len(), 1);
    assert_eq!(promoted.children[0].action, 'c');
}

#[test]
fn test_record_keeps_running_mean() {
    let mut q: QNode<u8, char, u8> = QNode::new('a', 0, 0.0);
    q.record(1.0);
    q.record(3.0);
    assert_eq!(q.visits, 2);
    assert!((q.value - 2.0).abs() < 1e-12);

    // Initial statistics count as prior samples
    let mut q: QNode<u8, char, u8> = QNode::new('a', 2, 5.0);
    q.record(2.0);
    assert_eq!(q.visits, 3);
    assert!((q.value - 4.0).abs() < 1e-12);
}

#[test]
fn test_best_action_criteria() {
    let mut node = leaf(vec![]);
    node.children.push(QNode::new('x', 10, 0.2));
    node.children.push(QNode::new('y', 3, 0.9));
    node.children.push(QNode::new('z', 10, 0.9));

    assert_eq!(node.best_action(BestChildCriteria::HighestValue), Some(&'y'));
    assert_eq!(node.best_action(BestChildCriteria::MostVisits), Some(&'x'));
    assert_eq!(leaf(vec![]).best_action(BestChildCriteria::HighestValue), None);
}

#[test]
fn test_set_qnode_replaces_in_place() {
    let mut node = leaf(vec![]);
    node.set_qnode(QNode::new('a', 0, 0.0));
    node.set_qnode(QNode::new('b', 0, 0.0));
    node.set_qnode(QNode::new('a', 7, 3.0));

    let actions: Vec<char> = node.children.iter().map(|q| q.action).collect();
    assert_eq!(actions, vec!['a', 'b']);
    assert_eq!(node.qnode(&'a').unwrap().visits, 7);
    assert_eq!(node.qnode(&'a').unwrap().value, 3.0);
}

#[test]
fn test_tree_size_counts_value_nodes() {
    assert_eq!(leaf(vec![]).tree_size(), 1);
    assert_eq!(sample_tree().tree_size(), 3);
}

#[test]
fn test_visualize_lists_nodes() {
    let root = RootNode::from_subtree(sample_tree(), Vec::new());
    let text = root.visualize();

    assert!(text.starts_with("Root (visits: 4, value: 0.000, particles: 3)"));
    assert!(text.contains("'a' (visits: 3, value: 1.000)"));
    assert!(text.contains("'b' (visits: 1, value: 0.000)"));
    assert!(text.contains("0 (visits: 0, value: 0.000, particles: 2)"));
    assert!(text.contains("'c' (visits: 1, value: 0.500)"));
}

#[test]
fn test_update_value_takes_best_action_value() {
    let mut root = sample_tree();
    assert_eq!(root.value, 0.0);

    root.update_value();
    assert_eq!(root.value, 1.0);

    // Negative action values are not clamped to the old estimate
    let mut node = leaf(vec![]);
    node.value = 5.0;
    node.children.push(QNode::new('x', 2, -3.0));
    node.children.push(QNode::new('y', 2, -1.5));
    node.update_value();
    assert_eq!(node.value, -1.5);

    // A leaf keeps its value
    let mut lone = leaf(vec![]);
    lone.value = 0.25;
    lone.update_value();
    assert_eq!(lone.value, 0.25);
}
