//! Tree data structures for belief-carrying Monte Carlo Tree Search
//!
//! The tree alternates between value nodes ([`VNode`]), one per history, and
//! action nodes ([`QNode`]), one per action tried from that history. Every
//! value node also carries a particle belief, so the tree doubles as the
//! belief store: states sampled by simulations are deposited into the node
//! for the history they reached.

use std::fmt::{self, Write};
use std::ops::{Deref, DerefMut};

use crate::{
    belief::Particles,
    config::BestChildCriteria,
    pomdp::{Action, History, Observation, Pomdp},
};

/// The value node type for a problem model
pub type NodeOf<P> = VNode<<P as Pomdp>::State, <P as Pomdp>::Action, <P as Pomdp>::Observation>;

/// The root node type for a problem model
pub type RootOf<P> =
    RootNode<<P as Pomdp>::State, <P as Pomdp>::Action, <P as Pomdp>::Observation>;

/// A value node: statistics, a particle belief and the action children
#[derive(Debug, Clone)]
pub struct VNode<S, A, O> {
    /// Number of simulations that passed through this node
    pub visits: u64,

    /// Value estimate of this node: the best action value once simulated
    pub value: f64,

    /// States that reached this node's history during simulation
    pub belief: Particles<S>,

    /// Action children, kept in insertion order
    pub children: Vec<QNode<S, A, O>>,
}

/// An action node: statistics and the observation children
#[derive(Debug, Clone)]
pub struct QNode<S, A, O> {
    /// The action this node represents
    pub action: A,

    /// Number of simulations that took this action
    pub visits: u64,

    /// Running mean of the discounted return after taking this action
    pub value: f64,

    /// Observation children, kept in insertion order
    pub children: Vec<(O, VNode<S, A, O>)>,
}

/// Result of looking up the node reached by an (action, observation) pair
#[derive(Debug)]
pub enum ChildSlot<'a, S, A, O> {
    /// No simulation ever produced this observation under this action
    Unsampled,

    /// A node exists but was never expanded, so it has no subtree
    Frontier(&'a VNode<S, A, O>),

    /// A node with action children
    Expanded(&'a VNode<S, A, O>),
}

impl<'a, S, A, O> ChildSlot<'a, S, A, O> {
    /// Returns the node for the slot, if any
    pub fn node(&self) -> Option<&'a VNode<S, A, O>> {
        match self {
            ChildSlot::Unsampled => None,
            ChildSlot::Frontier(node) | ChildSlot::Expanded(node) => Some(node),
        }
    }
}

impl<S, A: Action, O: Observation> VNode<S, A, O> {
    /// Creates a node without children
    pub fn new(visits: u64, value: f64, belief: Particles<S>) -> Self {
        VNode {
            visits,
            value,
            belief,
            children: Vec::new(),
        }
    }

    /// Returns true if the node has no action children yet
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the action node for `action`
    pub fn qnode(&self, action: &A) -> Option<&QNode<S, A, O>> {
        self.children.iter().find(|q| &q.action == action)
    }

    /// Mutable access to the action node for `action`
    pub fn qnode_mut(&mut self, action: &A) -> Option<&mut QNode<S, A, O>> {
        self.children.iter_mut().find(|q| &q.action == action)
    }

    /// Adds an action node, replacing any existing node for the same action in place
    pub fn set_qnode(&mut self, qnode: QNode<S, A, O>) {
        match self.children.iter_mut().find(|q| q.action == qnode.action) {
            Some(slot) => *slot = qnode,
            None => self.children.push(qnode),
        }
    }

    /// Classifies the child reached by `action` then `observation`
    ///
    /// An action that was never expanded counts as `Unsampled`: no
    /// transition was ever simulated for it.
    pub fn child_slot(&self, action: &A, observation: &O) -> ChildSlot<'_, S, A, O> {
        match self.qnode(action).and_then(|q| q.child(observation)) {
            None => ChildSlot::Unsampled,
            Some(node) if node.is_leaf() => ChildSlot::Frontier(node),
            Some(node) => ChildSlot::Expanded(node),
        }
    }

    /// Removes and returns the child reached by `action` then `observation`
    pub fn take_child(&mut self, action: &A, observation: &O) -> Option<VNode<S, A, O>> {
        self.qnode_mut(action)?.take_child(observation)
    }

    /// Returns the best action by the given criteria
    ///
    /// Ties go to the action that was inserted first.
    pub fn best_action(&self, criteria: BestChildCriteria) -> Option<&A> {
        let mut best: Option<&QNode<S, A, O>> = None;
        for child in &self.children {
            let better = match best {
                None => true,
                Some(current) => match criteria {
                    BestChildCriteria::HighestValue => child.value > current.value,
                    BestChildCriteria::MostVisits => child.visits > current.visits,
                },
            };
            if better {
                best = Some(child);
            }
        }
        best.map(|q| &q.action)
    }

    /// Sets the node's value to the best action value among its children
    ///
    /// A leaf keeps its current value.
    pub fn update_value(&mut self) {
        if let Some(best) = self.children.iter().map(|q| q.value).reduce(f64::max) {
            self.value = best;
        }
    }

    /// Number of value nodes in this subtree, including this one
    pub fn tree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .flat_map(|q| q.children.iter())
            .map(|(_, child)| child.tree_size())
            .sum::<usize>()
    }
}

impl<S, A: Action, O: Observation> QNode<S, A, O> {
    /// Creates an action node without children
    pub fn new(action: A, visits: u64, value: f64) -> Self {
        QNode {
            action,
            visits,
            value,
            children: Vec::new(),
        }
    }

    /// Returns the value node reached by `observation`
    pub fn child(&self, observation: &O) -> Option<&VNode<S, A, O>> {
        self.children
            .iter()
            .find(|(o, _)| o == observation)
            .map(|(_, node)| node)
    }

    /// Index of the value node reached by `observation`
    pub fn child_index(&self, observation: &O) -> Option<usize> {
        self.children.iter().position(|(o, _)| o == observation)
    }

    /// Removes and returns the value node reached by `observation`
    pub fn take_child(&mut self, observation: &O) -> Option<VNode<S, A, O>> {
        let index = self.child_index(observation)?;
        Some(self.children.swap_remove(index).1)
    }

    /// Folds one more return into the running mean
    pub fn record(&mut self, total_reward: f64) {
        self.visits += 1;
        self.value += (total_reward - self.value) / self.visits as f64;
    }
}

/// The root of a planning tree: a value node plus the history it stands for
#[derive(Debug, Clone)]
pub struct RootNode<S, A, O> {
    /// The root value node
    pub node: VNode<S, A, O>,

    /// The (action, observation) history this root represents
    pub history: History<A, O>,
}

impl<S, A: Action, O: Observation> RootNode<S, A, O> {
    /// Creates a root without children
    pub fn new(visits: u64, value: f64, belief: Particles<S>, history: History<A, O>) -> Self {
        RootNode {
            node: VNode::new(visits, value, belief),
            history,
        }
    }

    /// Promotes a subtree to be the new root
    ///
    /// The subtree's statistics, belief and children move into the root;
    /// nothing is copied.
    pub fn from_subtree(node: VNode<S, A, O>, history: History<A, O>) -> Self {
        RootNode { node, history }
    }

    /// Returns a text rendering of the tree
    pub fn visualize(&self) -> String
    where
        A: fmt::Debug,
        O: fmt::Debug,
    {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "Root (visits: {}, value: {:.3}, particles: {})",
            self.node.visits,
            self.node.value,
            self.node.belief.len()
        );
        visualize_node(&self.node, 1, &mut output);
        output
    }
}

impl<S, A, O> Deref for RootNode<S, A, O> {
    type Target = VNode<S, A, O>;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

impl<S, A, O> DerefMut for RootNode<S, A, O> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.node
    }
}

fn visualize_node<S, A: fmt::Debug, O: fmt::Debug>(
    node: &VNode<S, A, O>,
    depth: usize,
    output: &mut String,
) {
    let indent = "  ".repeat(depth);
    for q in &node.children {
        let _ = writeln!(
            output,
            "{}{:?} (visits: {}, value: {:.3})",
            indent, q.action, q.visits, q.value
        );
        for (observation, child) in &q.children {
            let _ = writeln!(
                output,
                "{}  {:?} (visits: {}, value: {:.3}, particles: {})",
                indent,
                observation,
                child.visits,
                child.value,
                child.belief.len()
            );
            visualize_node(child, depth + 2, output);
        }
    }
}
