use arboriter_pomcp::{
    policy::selection::{SelectionPolicy, UCB1Policy},
    utils, Particles, Pomdp, QNode, Transition, VNode,
};
use rand::RngCore;

/// Minimal model, only needed to name the node type
struct TestProblem;

impl Pomdp for TestProblem {
    type State = u8;
    type Action = u8;
    type Observation = u8;

    fn actions(&self, _state: Option<&u8>, _history: &[(u8, u8)]) -> Vec<u8> {
        vec![0, 1, 2]
    }

    fn sample(&self, state: &u8, _action: &u8, _rng: &mut dyn RngCore) -> Transition<u8, u8> {
        Transition {
            next_state: *state,
            observation: 0,
            reward: 0.0,
        }
    }
}

fn select(policy: &UCB1Policy, node: &VNode<u8, u8, u8>) -> Option<usize> {
    <UCB1Policy as SelectionPolicy<TestProblem>>::select_action(policy, node)
}

// Create a test node with specific characteristics for policy testing
fn create_test_node_for_policy() -> VNode<u8, u8, u8> {
    let mut node = VNode::new(100, 0.0, Particles::new());

    // Action 0: High value (0.9), high visits
    node.children.push(QNode::new(0, 50, 0.9));
    // Action 1: Low value (0.4), low visits
    node.children.push(QNode::new(1, 10, 0.4));

    node
}

#[test]
fn test_ucb1_exploration_exploitation_balance() {
    let node = create_test_node_for_policy();

    // With low exploration constant, exploitation dominates
    let policy_exploitative = UCB1Policy::new(0.1);
    assert_eq!(
        select(&policy_exploitative, &node),
        Some(0),
        "With low exploration constant, should prefer the action with higher value"
    );

    // With extremely high exploration constant, exploration dominates
    let policy_explorative = UCB1Policy::new(100.0);
    assert_eq!(
        select(&policy_explorative, &node),
        Some(1),
        "With high exploration constant, should prefer the less visited action"
    );
}

#[test]
fn test_ucb1_tries_untaken_actions_first() {
    let mut node = create_test_node_for_policy();
    node.children.push(QNode::new(2, 0, 0.0));
    node.children.push(QNode::new(3, 0, 0.0));

    // Both untaken actions score infinity; the earlier one wins
    assert_eq!(select(&UCB1Policy::default(), &node), Some(2));
}

#[test]
fn test_ucb1_on_leaf() {
    let node: VNode<u8, u8, u8> = VNode::new(0, 0.0, Particles::new());
    assert_eq!(select(&UCB1Policy::default(), &node), None);
}

#[test]
fn test_ucb1_formula() {
    let policy = UCB1Policy::new(2.0);
    let expected = 0.5 + 2.0 * ((10.0f64).ln() / 4.0).sqrt();

    assert!((policy.ucb1_value(0.5, 4, 9) - expected).abs() < 1e-12);
    assert!((utils::ucb1_value(0.5, 4, 9, 2.0) - expected).abs() < 1e-12);
    assert_eq!(policy.ucb1_value(0.5, 0, 9), f64::INFINITY);

    // A parent without visits gives no exploration bonus
    assert_eq!(utils::exploration_term(0, 1, 2.0), 0.0);
    assert_eq!(utils::exploration_term(5, 0, 2.0), f64::INFINITY);
}
