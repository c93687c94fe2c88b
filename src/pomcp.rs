//! POMCP: PO-UCT with particle beliefs stored in the tree
//!
//! Every value node keeps the states that simulations carried into its
//! history. Simulations start from states drawn from the root's particles,
//! and each one deposits the state it reached after its first step into the
//! depth-1 node it passed through. After a real step, [`Pomcp::update`]
//! promotes the matching depth-1 node to be the new root, so those deposited
//! states become the filtered belief. The filtered belief is reinvigorated
//! back to the episode's particle count and installed on both the agent and
//! the new root.
//!
//! # Example
//!
//! ```
//! use arboriter_pomcp::{
//!     belief::{Belief, Particles},
//!     Action, Agent, Observation, PlannerConfig, Pomcp, Pomdp, Transition,
//! };
//! use rand::RngCore;
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! struct Stay;
//! impl Action for Stay {}
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! struct Ping;
//! impl Observation for Ping {}
//!
//! struct Static;
//!
//! impl Pomdp for Static {
//!     type State = u8;
//!     type Action = Stay;
//!     type Observation = Ping;
//!
//!     fn actions(&self, _: Option<&u8>, _: &[(Stay, Ping)]) -> Vec<Stay> {
//!         vec![Stay]
//!     }
//!
//!     fn sample(&self, state: &u8, _: &Stay, _: &mut dyn RngCore) -> Transition<u8, Ping> {
//!         Transition { next_state: *state, observation: Ping, reward: 1.0 }
//!     }
//! }
//!
//! fn main() -> Result<(), arboriter_pomcp::PomcpError> {
//!     let belief: Particles<u8> = vec![0, 1, 2, 3].into();
//!     let mut agent = Agent::new(Static, Belief::Particles(belief));
//!     let mut planner = Pomcp::new(PlannerConfig::default().with_max_simulations(50).with_seed(1))?;
//!
//!     let action = planner.plan(&mut agent)?;
//!     agent.update_history(action, Ping);
//!     planner.update(&mut agent, &action, &Ping)?;
//!
//!     // Survivors are never down-sampled, only topped up
//!     assert!(agent.belief().as_particles()?.len() >= 4);
//!     Ok(())
//! }
//! ```

use log::{info, warn};
use rand::RngCore;

use crate::{
    agent::Agent,
    belief::{Belief, Particles},
    config::PlannerConfig,
    policy::{prior::ActionPrior, rollout::RolloutPolicy, selection::SelectionPolicy},
    pomdp::Pomdp,
    reinvigoration::{self, Reinvigoration, StateTransform},
    search::{SearchEngine, TreeHooks},
    stats::SearchStatistics,
    tree::{ChildSlot, NodeOf, RootNode, RootOf, VNode},
    Planner, PomcpError, Result,
};

/// Hooks for trees whose nodes carry particle beliefs
#[derive(Debug, Clone, Copy, Default)]
pub struct ParticleTree;

impl<P: Pomdp> TreeHooks<P> for ParticleTree {
    /// Seeds the root with copies of the agent's belief and history
    fn new_root(&self, config: &PlannerConfig, agent: Option<&Agent<P>>) -> Result<RootOf<P>> {
        let agent = agent.ok_or_else(|| {
            PomcpError::MissingContext("a root node is built from an agent".to_string())
        })?;
        Ok(RootNode::new(
            config.num_visits_init,
            config.value_init,
            agent.belief().as_particles()?.clone(),
            agent.history().to_vec(),
        ))
    }

    /// Empty belief without an agent, a copy of the agent's particles with one
    fn new_node(&self, config: &PlannerConfig, agent: Option<&Agent<P>>) -> NodeOf<P> {
        let belief = agent
            .and_then(|agent| agent.belief().as_particles().ok())
            .cloned()
            .unwrap_or_default();
        VNode::new(config.num_visits_init, config.value_init, belief)
    }

    fn expansion_belief<'n>(&self, node: &'n NodeOf<P>) -> Option<&'n Particles<P::State>> {
        Some(&node.belief)
    }

    fn sample_root_state(
        &self,
        root: &RootOf<P>,
        _agent: &Agent<P>,
        rng: &mut dyn RngCore,
    ) -> Result<P::State> {
        root.belief.random(rng).cloned().ok_or_else(|| {
            PomcpError::ParticleDeprivation("the root belief holds no particles".to_string())
        })
    }

    fn after_simulate(&self, node: &mut NodeOf<P>, state: &P::State, depth: usize) {
        if depth == 1 {
            node.belief.add(state.clone());
        }
    }
}

/// The POMCP planner
///
/// Only works for problems whose action space can be enumerated.
pub struct Pomcp<P: Pomdp> {
    engine: SearchEngine<P>,

    /// Particle count of the first belief this planner planned from
    target_particles: Option<usize>,
}

impl<P: Pomdp> Pomcp<P> {
    /// Creates a planner with UCB1 selection and random rollouts
    ///
    /// # Errors
    ///
    /// Returns [`PomcpError::InvalidConfiguration`] if `config` does not validate.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        Ok(Pomcp {
            engine: SearchEngine::new(config)?,
            target_particles: None,
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
    ///
    /// The prior sees the belief of the node being expanded.
    pub fn with_action_prior<A: ActionPrior<P> + 'static>(mut self, prior: A) -> Self {
        self.engine = self.engine.with_action_prior(prior);
        self
    }

    /// The configuration
    pub fn config(&self) -> &PlannerConfig {
        self.engine.config()
    }

    /// Returns the search statistics
    pub fn statistics(&self) -> &SearchStatistics {
        self.engine.statistics()
    }

    /// Searches from the agent's current history and returns the best action
    ///
    /// The agent's belief is left untouched; the tree's beliefs grow as
    /// simulations run and reach the agent only through [`Pomcp::update`].
    ///
    /// # Errors
    ///
    /// * [`PomcpError::RepresentationMismatch`] if the agent's belief is not particles
    /// * [`PomcpError::ParticleDeprivation`] if the root belief is empty
    /// * [`PomcpError::HistoryMismatch`] if the agent's tree stands for another history
    /// * [`PomcpError::NoActions`] if the model offers no action at the root
    pub fn plan(&mut self, agent: &mut Agent<P>) -> Result<P::Action> {
        let population = agent.belief().as_particles()?.len();
        self.target_particles.get_or_insert(population);
        self.engine.search(&ParticleTree, agent)
    }

    /// Advances the tree and the agent's belief by one real step
    ///
    /// Same as [`Pomcp::update_with_transform`] without a perturbation.
    pub fn update(
        &mut self,
        agent: &mut Agent<P>,
        real_action: &P::Action,
        real_observation: &P::Observation,
    ) -> Result<()> {
        self.update_with_transform(agent, real_action, real_observation, None)
    }

    /// Advances the tree and the agent's belief by one real step
    ///
    /// The agent's history must already end with the real step. The node
    /// reached by `real_action` and `real_observation` becomes the new root
    /// with its statistics, and is expanded if it has no children yet. Its
    /// particles are reinvigorated up to the size of the belief this planner
    /// first planned from, passing synthesized particles through `transform`,
    /// and the result becomes both the agent's belief and the new root's
    /// belief.
    ///
    /// Without a tree this only logs a warning. On error neither the tree nor
    /// the belief is changed.
    ///
    /// # Errors
    ///
    /// * [`PomcpError::RepresentationMismatch`] if the agent's belief is not particles
    /// * [`PomcpError::ParticleDeprivation`] if no simulated particle reached the real step
    pub fn update_with_transform(
        &mut self,
        agent: &mut Agent<P>,
        real_action: &P::Action,
        real_observation: &P::Observation,
        transform: Option<StateTransform<'_, P::State>>,
    ) -> Result<()> {
        let current = agent.belief().as_particles()?.len();

        let Some(mut tree) = agent.take_tree() else {
            warn!("Agent has no tree to update; has it planned yet?");
            return Ok(());
        };
        let target = self.target_particles.unwrap_or(current);

        let outcome = match tree.child_slot(real_action, real_observation) {
            ChildSlot::Unsampled => Err(PomcpError::ParticleDeprivation(format!(
                "observation {:?} was never simulated after action {:?}",
                real_observation, real_action
            ))),
            ChildSlot::Frontier(node) | ChildSlot::Expanded(node) => {
                self.reinvigorate(&node.belief, target, transform)
            }
        };
        let restored = match outcome {
            Ok(restored) => restored.particles,
            Err(e) => {
                agent.set_tree(tree);
                return Err(e);
            }
        };

        let history = agent.history().to_vec();
        let node = tree.take_child(real_action, real_observation).unwrap_or_else(|| {
            let config = self.engine.config();
            VNode::new(config.num_visits_init, config.value_init, Particles::new())
        });
        info!(
            "Promoting node for {:?} / {:?} with {} visits",
            real_action, real_observation, node.visits
        );
        let mut root = RootNode::from_subtree(node, history);
        root.node.belief = restored.clone();
        if root.node.is_leaf() {
            // Nothing was expanded below the real step
            self.engine.expand(
                &ParticleTree,
                agent.model(),
                &mut root.node,
                &root.history,
                None,
            );
        }

        agent.set_belief(Belief::Particles(restored));
        agent.set_tree(root);
        Ok(())
    }

    fn reinvigorate(
        &mut self,
        particles: &Particles<P::State>,
        target: usize,
        transform: Option<StateTransform<'_, P::State>>,
    ) -> Result<Reinvigoration<P::State>> {
        let outcome =
            reinvigoration::reinvigorate(particles, target, transform, self.engine.rng_mut())?;
        self.engine.statistics_mut().particles_synthesized += outcome.synthesized;
        Ok(outcome)
    }
}

impl<P: Pomdp> Planner<P> for Pomcp<P> {
    fn plan(&mut self, agent: &mut Agent<P>) -> Result<P::Action> {
        Pomcp::plan(self, agent)
    }

    fn update(
        &mut self,
        agent: &mut Agent<P>,
        real_action: &P::Action,
        real_observation: &P::Observation,
    ) -> Result<()> {
        Pomcp::update(self, agent, real_action, real_observation)
    }

    fn updates_agent_belief(&self) -> bool {
        true
    }

    fn statistics(&self) -> &SearchStatistics {
        Pomcp::statistics(self)
    }
}
