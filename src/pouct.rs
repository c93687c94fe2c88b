//! PO-UCT: UCT over histories without belief tracking
//!
//! The plain planner samples simulation start states from the agent's belief
//! in whatever representation it is held, and keeps the tree between steps.
//! It never changes the agent's belief; belief updates are the caller's job.

use log::{info, warn};
use rand::RngCore;

use crate::{
    agent::Agent,
    belief::Particles,
    config::PlannerConfig,
    policy::{prior::ActionPrior, rollout::RolloutPolicy, selection::SelectionPolicy},
    pomdp::Pomdp,
    search::{SearchEngine, TreeHooks},
    stats::SearchStatistics,
    tree::{NodeOf, RootNode, RootOf, VNode},
    Planner, PomcpError, Result,
};

/// Hooks for trees whose nodes carry no belief
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTree;

impl<P: Pomdp> TreeHooks<P> for PlainTree {
    fn new_root(&self, config: &PlannerConfig, agent: Option<&Agent<P>>) -> Result<RootOf<P>> {
        let agent = agent.ok_or_else(|| {
            PomcpError::MissingContext("a root node is built from an agent".to_string())
        })?;
        Ok(RootNode::new(
            config.num_visits_init,
            config.value_init,
            Particles::new(),
            agent.history().to_vec(),
        ))
    }

    fn new_node(&self, config: &PlannerConfig, _agent: Option<&Agent<P>>) -> NodeOf<P> {
        VNode::new(config.num_visits_init, config.value_init, Particles::new())
    }

    fn sample_root_state(
        &self,
        _root: &RootOf<P>,
        agent: &Agent<P>,
        rng: &mut dyn RngCore,
    ) -> Result<P::State> {
        agent
            .belief()
            .sample(rng)
            .cloned()
            .ok_or(PomcpError::EmptyBelief)
    }
}

/// The PO-UCT planner
pub struct Pouct<P: Pomdp> {
    engine: SearchEngine<P>,
}

impl<P: Pomdp> Pouct<P> {
    /// Creates a planner with UCB1 selection and random rollouts
    pub fn new(config: PlannerConfig) -> Result<Self> {
        Ok(Pouct {
            engine: SearchEngine::new(config)?,
        })
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<S: SelectionPolicy<P> + 'static>(mut self, policy: S) -> Self {
        self.engine = self.engine.with_selection_policy(policy);
        self
    }

    /// Sets the rollout policy to use
    pub fn with_rollout_policy<R: RolloutPolicy<P> + 'static>(mut self, policy: R) -> Self {
        self.engine = self.engine.with_rollout_policy(policy);
        self
    }

    /// Sets the action prior to use at expansion
    pub fn with_action_prior<A: ActionPrior<P> + 'static>(mut self, prior: A) -> Self {
        self.engine = self.engine.with_action_prior(prior);
        self
    }

    /// Searches from the agent's current history and returns the best action
    pub fn plan(&mut self, agent: &mut Agent<P>) -> Result<P::Action> {
        self.engine.search(&PlainTree, agent)
    }

    /// Moves the tree to the subtree reached by the real step
    ///
    /// When the step was never simulated the tree restarts from a fresh root.
    /// Without a tree this only logs a warning.
    pub fn update(
        &mut self,
        agent: &mut Agent<P>,
        real_action: &P::Action,
        real_observation: &P::Observation,
    ) -> Result<()> {
        let Some(mut tree) = agent.take_tree() else {
            warn!("Agent has no tree to update; has it planned yet?");
            return Ok(());
        };

        let root = match tree.take_child(real_action, real_observation) {
            Some(node) => {
                info!("Reusing subtree for {:?} / {:?}", real_action, real_observation);
                RootNode::from_subtree(node, agent.history().to_vec())
            }
            None => {
                <PlainTree as TreeHooks<P>>::new_root(&PlainTree, self.engine.config(), Some(&*agent))?
            }
        };
        agent.set_tree(root);
        Ok(())
    }

    /// Returns the search statistics
    pub fn statistics(&self) -> &SearchStatistics {
        self.engine.statistics()
    }
}

impl<P: Pomdp> Planner<P> for Pouct<P> {
    fn plan(&mut self, agent: &mut Agent<P>) -> Result<P::Action> {
        Pouct::plan(self, agent)
    }

    fn update(
        &mut self,
        agent: &mut Agent<P>,
        real_action: &P::Action,
        real_observation: &P::Observation,
    ) -> Result<()> {
        Pouct::update(self, agent, real_action, real_observation)
    }

    fn updates_agent_belief(&self) -> bool {
        false
    }

    fn statistics(&self) -> &SearchStatistics {
        Pouct::statistics(self)
    }
}
