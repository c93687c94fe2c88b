//! Rollout policies
//!
//! A rollout policy chooses actions beyond the frontier of the tree, where no
//! statistics exist yet, to estimate the value of the state reached.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::pomdp::Pomdp;

/// Trait for policies that choose actions during rollout
pub trait RolloutPolicy<P: Pomdp> {
    /// Chooses the next action, or `None` if no action is available
    fn rollout(
        &self,
        model: &P,
        state: &P::State,
        history: &[(P::Action, P::Observation)],
        rng: &mut dyn RngCore,
    ) -> Option<P::Action>;
}

/// Uniformly random rollout policy
///
/// Picks uniformly among the actions the model reports for the state.
#[derive(Debug, Clone, Default)]
pub struct RandomRollout;

impl RandomRollout {
    /// Creates a new random rollout policy
    pub fn new() -> Self {
        RandomRollout
    }
}

impl<P: Pomdp> RolloutPolicy<P> for RandomRollout {
    fn rollout(
        &self,
        model: &P,
        state: &P::State,
        history: &[(P::Action, P::Observation)],
        rng: &mut dyn RngCore,
    ) -> Option<P::Action> {
        model.actions(Some(state), history).choose(rng).cloned()
    }
}

/// Rollout policy backed by a closure
///
/// Handy for domain heuristics that only need the state.
pub struct FnRollout<F> {
    policy: F,
}

impl<F> FnRollout<F> {
    /// Wraps a function `(state, rng) -> action`
    pub fn new(policy: F) -> Self {
        FnRollout { policy }
    }
}

impl<P, F> RolloutPolicy<P> for FnRollout<F>
where
    P: Pomdp,
    F: Fn(&P::State, &mut dyn RngCore) -> Option<P::Action>,
{
    fn rollout(
        &self,
        _model: &P,
        state: &P::State,
        _history: &[(P::Action, P::Observation)],
        rng: &mut dyn RngCore,
    ) -> Option<P::Action> {
        (self.policy)(state, rng)
    }
}
