//! Selection policies for the tree descent
//!
//! Selection policies determine which action to follow from a value node,
//! balancing exploration and exploitation.

use crate::{pomdp::Pomdp, tree::NodeOf, utils};

/// Trait for policies that select the action to follow during descent
pub trait SelectionPolicy<P: Pomdp> {
    /// Returns the index of the chosen action child, or `None` if there are none
    fn select_action(&self, node: &NodeOf<P>) -> Option<usize>;
}

/// Upper Confidence Bound 1 (UCB1) selection policy
///
/// This is the classic selection rule for UCT, applied to action nodes:
///
/// ```text
/// UCB1 = value + exploration_constant * sqrt(ln(parent_visits + 1) / action_visits)
/// ```
///
/// Actions that were never taken score infinity and are tried first. Among
/// equal scores the earliest inserted action wins.
#[derive(Debug, Clone)]
pub struct UCB1Policy {
    /// Exploration constant that controls the balance between exploration and exploitation.
    /// Higher values favor exploration of less-visited actions.
    pub exploration_constant: f64,
}

impl UCB1Policy {
    /// Creates a new UCB1 policy with the given exploration constant
    pub fn new(exploration_constant: f64) -> Self {
        UCB1Policy {
            exploration_constant,
        }
    }

    /// Calculates the UCB1 value for an action
    pub fn ucb1_value(&self, action_value: f64, action_visits: u64, parent_visits: u64) -> f64 {
        utils::ucb1_value(
            action_value,
            action_visits,
            parent_visits,
            self.exploration_constant,
        )
    }
}

impl Default for UCB1Policy {
    fn default() -> Self {
        Self::new(std::f64::consts::SQRT_2)
    }
}

impl<P: Pomdp> SelectionPolicy<P> for UCB1Policy {
    fn select_action(&self, node: &NodeOf<P>) -> Option<usize> {
        let mut best_value = f64::NEG_INFINITY;
        let mut best_index = None;

        for (i, child) in node.children.iter().enumerate() {
            let ucb_value = self.ucb1_value(child.value, child.visits, node.visits);

            if best_index.is_none() || ucb_value > best_value {
                best_value = ucb_value;
                best_index = Some(i);
            }
        }

        best_index
    }
}
