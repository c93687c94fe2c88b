//! The base PO-UCT search engine
//!
//! This module contains the budgeted simulate loop shared by the planners:
//! UCB1 descent over action nodes, expansion of new histories, rollout beyond
//! the tree frontier and backpropagation of discounted returns. What a node
//! holds, where a simulation starts and what happens after a node has been
//! simulated through is delegated to a [`TreeHooks`] implementation.

use std::time::Instant;

use log::debug;
use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::{
    agent::Agent,
    belief::Particles,
    config::PlannerConfig,
    policy::{
        prior::{ActionPrior, PriorContext},
        rollout::{RandomRollout, RolloutPolicy},
        selection::{SelectionPolicy, UCB1Policy},
    },
    pomdp::{History, Pomdp},
    stats::SearchStatistics,
    tree::{NodeOf, QNode, RootOf},
    PomcpError, Result,
};

/// Extension points of the search engine
///
/// A planner customizes the generic search by supplying these hooks. The
/// engine never builds a node or picks a start state on its own.
pub trait TreeHooks<P: Pomdp> {
    /// Builds the root for the agent's current history
    ///
    /// # Errors
    ///
    /// Returns [`PomcpError::MissingContext`] if `agent` is `None`.
    fn new_root(&self, config: &PlannerConfig, agent: Option<&Agent<P>>) -> Result<RootOf<P>>;

    /// Builds a non-root node
    ///
    /// The engine calls this with `agent == None` for every history first
    /// reached during simulation.
    fn new_node(&self, config: &PlannerConfig, agent: Option<&Agent<P>>) -> NodeOf<P>;

    /// The belief handed to the action prior when `node` is expanded
    fn expansion_belief<'n>(&self, _node: &'n NodeOf<P>) -> Option<&'n Particles<P::State>> {
        None
    }

    /// Draws the hidden state a simulation starts from
    fn sample_root_state(
        &self,
        root: &RootOf<P>,
        agent: &Agent<P>,
        rng: &mut dyn RngCore,
    ) -> Result<P::State>;

    /// Called after a simulation passed through an existing `node` at `depth`
    ///
    /// `state` is the sampled state the simulation was in at that node.
    fn after_simulate(&self, _node: &mut NodeOf<P>, _state: &P::State, _depth: usize) {}
}

/// The search engine: configuration, policies, randomness and statistics
pub struct SearchEngine<P: Pomdp> {
    /// Configuration for the search
    config: PlannerConfig,

    /// Policy for choosing actions during descent
    selection_policy: Box<dyn SelectionPolicy<P>>,

    /// Policy for choosing actions beyond the frontier
    rollout_policy: Box<dyn RolloutPolicy<P>>,

    /// Optional heuristic consulted at expansion
    action_prior: Option<Box<dyn ActionPrior<P>>>,

    /// Source of all randomness in the search
    rng: StdRng,

    /// Statistics gathered during search
    statistics: SearchStatistics,
}

impl<P: Pomdp> SearchEngine<P> {
    /// Creates an engine with UCB1 selection and random rollouts
    ///
    /// # Errors
    ///
    /// Returns [`PomcpError::InvalidConfiguration`] if `config` does not validate.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(SearchEngine {
            selection_policy: Box::new(UCB1Policy::new(config.exploration_constant)),
            rollout_policy: Box::new(RandomRollout::new()),
            action_prior: None,
            rng,
            statistics: SearchStatistics::new(),
            config,
        })
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<S: SelectionPolicy<P> + 'static>(mut self, policy: S) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the rollout policy to use
    pub fn with_rollout_policy<R: RolloutPolicy<P> + 'static>(mut self, policy: R) -> Self {
        self.rollout_policy = Box::new(policy);
        self
    }

    /// Sets the action prior to use at expansion
    pub fn with_action_prior<A: ActionPrior<P> + 'static>(mut self, prior: A) -> Self {
        self.action_prior = Some(Box::new(prior));
        self
    }

    /// The configuration
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Returns the search statistics
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    pub(crate) fn statistics_mut(&mut self) -> &mut SearchStatistics {
        &mut self.statistics
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Runs a budgeted search for the agent and returns the best root action
    ///
    /// The agent's tree is reused when present, otherwise a root is built
    /// through `hooks`. The tree is handed back to the agent afterwards,
    /// including when the search fails.
    ///
    /// # Errors
    ///
    /// * [`PomcpError::HistoryMismatch`] if the agent's tree stands for another history
    /// * [`PomcpError::NoActions`] if the root has no action children
    /// * whatever `hooks` report when building the root or sampling a state
    pub fn search<H: TreeHooks<P>>(&mut self, hooks: &H, agent: &mut Agent<P>) -> Result<P::Action> {
        let mut root = match agent.take_tree() {
            Some(root) => root,
            None => hooks.new_root(&self.config, Some(&*agent))?,
        };

        if root.history.as_slice() != agent.history() {
            agent.set_tree(root);
            return Err(PomcpError::HistoryMismatch);
        }

        let result = self.run(hooks, agent, &mut root);
        agent.set_tree(root);
        result
    }

    fn run<H: TreeHooks<P>>(
        &mut self,
        hooks: &H,
        agent: &Agent<P>,
        root: &mut RootOf<P>,
    ) -> Result<P::Action> {
        self.statistics.reset_search();

        let model = agent.model();
        let start_time = Instant::now();
        let mut history = root.history.clone();

        if root.node.is_leaf() {
            let state = hooks.sample_root_state(root, agent, &mut self.rng)?;
            self.expand(hooks, model, &mut root.node, &history, Some(&state));
        }

        // Main search loop
        let mut simulations = 0;
        loop {
            if self.config.max_simulations > 0 && simulations >= self.config.max_simulations {
                break;
            }
            if let Some(max_duration) = self.config.max_time {
                if start_time.elapsed() >= max_duration {
                    self.statistics.stopped_early = true;
                    debug!("Search stopped after {} simulations due to time limit", simulations);
                    break;
                }
            }

            let state = hooks.sample_root_state(root, agent, &mut self.rng)?;
            self.simulate(hooks, model, &state, &mut history, &mut root.node, 0);

            simulations += 1;
            self.statistics.simulations = simulations;
        }

        self.statistics.total_time = start_time.elapsed();
        self.statistics.tree_size = root.node.tree_size();
        debug!(
            "Searched {} simulations in {:?}, tree size {}",
            self.statistics.simulations, self.statistics.total_time, self.statistics.tree_size
        );

        root.node
            .best_action(self.config.best_child_criteria)
            .cloned()
            .ok_or(PomcpError::NoActions)
    }

    /// Simulates one trajectory through `node` and returns its discounted return
    fn simulate<H: TreeHooks<P>>(
        &mut self,
        hooks: &H,
        model: &P,
        state: &P::State,
        history: &mut History<P::Action, P::Observation>,
        node: &mut NodeOf<P>,
        depth: usize,
    ) -> f64 {
        let total_reward = self.simulate_node(hooks, model, state, history, node, depth);
        hooks.after_simulate(node, state, depth);
        total_reward
    }

    fn simulate_node<H: TreeHooks<P>>(
        &mut self,
        hooks: &H,
        model: &P,
        state: &P::State,
        history: &mut History<P::Action, P::Observation>,
        node: &mut NodeOf<P>,
        depth: usize,
    ) -> f64 {
        if depth > self.config.max_depth || model.is_terminal(state) {
            return 0.0;
        }
        self.statistics.max_depth = self.statistics.max_depth.max(depth);

        if node.is_leaf() {
            self.expand(hooks, model, node, history, Some(state));
        }

        // 1. Selection
        let Some(index) = self.selection_policy.select_action(node) else {
            return 0.0;
        };
        let action = node.children[index].action.clone();
        let transition = model.sample(state, &action, &mut self.rng);
        history.push((action, transition.observation.clone()));

        let next_depth = depth + 1;
        let qnode = &mut node.children[index];
        let future = match qnode.child_index(&transition.observation) {
            Some(child) => self.simulate(
                hooks,
                model,
                &transition.next_state,
                history,
                &mut qnode.children[child].1,
                next_depth,
            ),
            None if next_depth > self.config.max_depth => 0.0,
            None => {
                // 2. Expansion
                let mut child = hooks.new_node(&self.config, None);
                if !model.is_terminal(&transition.next_state) {
                    self.expand(hooks, model, &mut child, history, Some(&transition.next_state));
                }
                // 3. Rollout
                let value = self.rollout(model, &transition.next_state, history, next_depth);
                qnode.children.push((transition.observation, child));
                value
            }
        };
        history.pop();

        // 4. Backpropagation
        let total_reward = transition.reward + self.config.discount_factor * future;
        node.visits += 1;
        node.children[index].record(total_reward);
        node.update_value();
        total_reward
    }

    /// Adds action children to `node`
    ///
    /// Every action the model offers gets a fresh action node unless one
    /// exists already. The action prior, if any, then overrides the initial
    /// statistics of its preferred actions.
    pub(crate) fn expand<H: TreeHooks<P>>(
        &self,
        hooks: &H,
        model: &P,
        node: &mut NodeOf<P>,
        history: &[(P::Action, P::Observation)],
        state: Option<&P::State>,
    ) {
        for action in model.actions(state, history) {
            if node.qnode(&action).is_none() {
                node.children.push(QNode::new(
                    action,
                    self.config.num_visits_init,
                    self.config.value_init,
                ));
            }
        }

        if let Some(prior) = &self.action_prior {
            let preferences = {
                let context = PriorContext {
                    state,
                    history,
                    belief: hooks.expansion_belief(node),
                };
                prior.preferred_actions(model, &context)
            };
            for preference in preferences {
                node.set_qnode(QNode::new(
                    preference.action,
                    preference.num_visits_init,
                    preference.value_init,
                ));
            }
        }
    }

    /// Plays the rollout policy from `state` until the horizon and returns the discounted return
    fn rollout(
        &mut self,
        model: &P,
        state: &P::State,
        history: &mut History<P::Action, P::Observation>,
        depth: usize,
    ) -> f64 {
        let base_len = history.len();
        let mut state = state.clone();
        let mut depth = depth;
        let mut discount = 1.0;
        let mut total_discounted_reward = 0.0;

        while depth < self.config.max_depth && !model.is_terminal(&state) {
            let Some(action) = self
                .rollout_policy
                .rollout(model, &state, history, &mut self.rng)
            else {
                break;
            };
            let transition = model.sample(&state, &action, &mut self.rng);
            history.push((action, transition.observation));

            total_discounted_reward += transition.reward * discount;
            discount *= self.config.discount_factor;
            depth += 1;
            state = transition.next_state;
        }

        history.truncate(base_len);
        total_discounted_reward
    }
}
