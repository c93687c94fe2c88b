//! Traits defining the problem model for POMDP planning.
//!
//! The [`Pomdp`] trait is the primary interface that must be implemented for any
//! partially observable decision problem planned over with this crate. It plays
//! the role of a generative model: given a hidden state and an action it samples
//! the next state, the observation the agent receives and the immediate reward.

use std::fmt::Debug;

use rand::RngCore;

/// Trait for actions that can be taken by the agent
///
/// Actions are compared by value when the planner looks up the branch that
/// was taken in the real environment.
pub trait Action: Clone + Debug + PartialEq {}

/// Trait for observations received from the environment
///
/// Observations key the children of an action node, so two observations
/// that compare equal lead to the same belief node.
pub trait Observation: Clone + Debug + PartialEq {}

/// The sequence of (action, observation) pairs since the start of an episode
pub type History<A, O> = Vec<(A, O)>;

/// One sampled step of the generative model
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, O> {
    /// Hidden state after the action
    pub next_state: S,

    /// Observation emitted by the environment
    pub observation: O,

    /// Immediate reward for taking the action
    pub reward: f64,
}

/// Trait defining the generative model required for planning
///
/// The model is queried only through sampling; no explicit transition or
/// observation probabilities are needed.
///
/// # Example
///
/// ```
/// use arboriter_pomcp::{Action, History, Observation, Pomdp, Transition};
/// use rand::{Rng, RngCore};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Flip;
/// impl Action for Flip {}
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Heads(bool);
/// impl Observation for Heads {}
///
/// struct Coin;
///
/// impl Pomdp for Coin {
///     type State = bool;
///     type Action = Flip;
///     type Observation = Heads;
///
///     fn actions(&self, _state: Option<&bool>, _history: &[(Flip, Heads)]) -> Vec<Flip> {
///         vec![Flip]
///     }
///
///     fn sample(&self, _state: &bool, _action: &Flip, rng: &mut dyn RngCore) -> Transition<bool, Heads> {
///         let next: bool = rng.gen();
///         Transition { next_state: next, observation: Heads(next), reward: 0.0 }
///     }
/// }
/// ```
pub trait Pomdp {
    /// Hidden state of the environment
    type State: Clone + Debug;

    /// Actions available to the agent
    type Action: Action;

    /// Observations emitted by the environment
    type Observation: Observation;

    /// Returns every action that may be taken given the state (if known) and history
    ///
    /// During expansion the planner passes the state sampled for the current
    /// trajectory; when a root is built without a concrete state, `state` is
    /// `None` and the implementation should return the full action set.
    fn actions(
        &self,
        state: Option<&Self::State>,
        history: &[(Self::Action, Self::Observation)],
    ) -> Vec<Self::Action>;

    /// Samples the next state, observation and reward for taking `action` in `state`
    ///
    /// This method must not modify the model; all randomness comes from `rng`
    /// so that seeded planners are reproducible.
    fn sample(
        &self,
        state: &Self::State,
        action: &Self::Action,
        rng: &mut dyn RngCore,
    ) -> Transition<Self::State, Self::Observation>;

    /// Returns true if no further reward can be collected from this state
    ///
    /// Default implementation treats every state as non-terminal, leaving the
    /// depth limit as the only horizon.
    fn is_terminal(&self, _state: &Self::State) -> bool {
        false
    }
}

impl Action for usize {}
impl Action for u8 {}
impl Action for i32 {}
impl Action for char {}
impl Action for String {}

impl Observation for usize {}
impl Observation for u8 {}
impl Observation for i32 {}
impl Observation for bool {}
impl Observation for char {}
impl Observation for String {}
