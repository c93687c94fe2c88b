//! Action priors
//!
//! An action prior is a domain heuristic consulted when a value node is
//! expanded. It may seed chosen actions with optimistic (or pessimistic)
//! visit counts and values, steering the early search.

use crate::{belief::Particles, pomdp::Pomdp};

/// Initial statistics for a preferred action
#[derive(Debug, Clone, PartialEq)]
pub struct Preference<A> {
    /// The preferred action
    pub action: A,

    /// Visit count the action node starts with
    pub num_visits_init: u64,

    /// Value the action node starts with
    pub value_init: f64,
}

impl<A> Preference<A> {
    /// Creates a preference
    pub fn new(action: A, num_visits_init: u64, value_init: f64) -> Self {
        Preference {
            action,
            num_visits_init,
            value_init,
        }
    }
}

/// What the prior knows about the node being expanded
pub struct PriorContext<'a, P: Pomdp> {
    /// State sampled for the current trajectory, if any
    pub state: Option<&'a P::State>,

    /// History of the node being expanded
    pub history: &'a [(P::Action, P::Observation)],

    /// Belief stored in the node being expanded
    ///
    /// `None` for planners whose nodes carry no belief.
    pub belief: Option<&'a Particles<P::State>>,
}

/// Trait for heuristics that prefer some actions at expansion time
pub trait ActionPrior<P: Pomdp> {
    /// Returns the preferred actions with their initial statistics
    fn preferred_actions(&self, model: &P, context: &PriorContext<'_, P>)
        -> Vec<Preference<P::Action>>;
}
