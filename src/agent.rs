//! The planning agent
//!
//! An [`Agent`] bundles what a planner needs to know about one episode: the
//! problem model, the belief the episode started with, the current belief, the
//! real history so far and the search tree kept between planning calls.

use crate::{
    belief::Belief,
    pomdp::{History, Pomdp},
    tree::RootOf,
};

/// An agent acting in one episode of a POMDP
pub struct Agent<P: Pomdp> {
    model: P,
    init_belief: Belief<P::State>,
    belief: Belief<P::State>,
    history: History<P::Action, P::Observation>,
    tree: Option<RootOf<P>>,
}

impl<P: Pomdp> Agent<P> {
    /// Creates an agent with an empty history and no tree
    ///
    /// The initial belief is kept for the whole episode; POMCP uses its size
    /// as the particle population to maintain.
    pub fn new(model: P, init_belief: Belief<P::State>) -> Self {
        let belief = init_belief.clone();
        Agent {
            model,
            init_belief,
            belief,
            history: Vec::new(),
            tree: None,
        }
    }

    /// The problem model
    pub fn model(&self) -> &P {
        &self.model
    }

    /// The belief the episode started with
    pub fn init_belief(&self) -> &Belief<P::State> {
        &self.init_belief
    }

    /// The current belief
    pub fn belief(&self) -> &Belief<P::State> {
        &self.belief
    }

    /// Replaces the current belief
    pub fn set_belief(&mut self, belief: Belief<P::State>) {
        self.belief = belief;
    }

    /// The real (action, observation) history
    pub fn history(&self) -> &[(P::Action, P::Observation)] {
        &self.history
    }

    /// Appends a real step to the history
    ///
    /// Call this after acting and before the planner's `update`.
    pub fn update_history(&mut self, action: P::Action, observation: P::Observation) {
        self.history.push((action, observation));
    }

    /// The search tree from the last planning call, if any
    pub fn tree(&self) -> Option<&RootOf<P>> {
        self.tree.as_ref()
    }

    /// Removes the search tree from the agent
    pub fn take_tree(&mut self) -> Option<RootOf<P>> {
        self.tree.take()
    }

    /// Installs a search tree
    pub fn set_tree(&mut self, tree: RootOf<P>) {
        self.tree = Some(tree);
    }
}
