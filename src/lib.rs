//! # arboriter-pomcp
//!
//! Online planning for partially observable problems (POMDPs) with Monte Carlo
//! Tree Search over histories.
//!
//! The crate provides two planners sharing one search engine:
//!
//! - [`Pouct`]: UCT over action/observation histories, sampling simulation
//!   start states from the agent's belief.
//! - [`Pomcp`]: PO-UCT whose tree also stores particle beliefs. The belief
//!   after a real step is read off the tree instead of being filtered
//!   separately, then reinvigorated back to its original population.
//!
//! ## Features
//!
//! - Generic over any generative [`Pomdp`] model with an enumerable action set
//! - Budgeted search by simulation count and/or wall-clock time
//! - Tree reuse across real steps
//! - Particle reinvigoration with optional domain perturbation
//! - Pluggable selection, rollout and action-prior policies
//! - Seedable, reproducible search
//!
//! ## Basic Usage
//!
//! ```
//! use arboriter_pomcp::{
//!     belief::{Belief, Particles},
//!     Action, Agent, Observation, PlannerConfig, Pomcp, Pomdp, Transition,
//! };
//! use rand::{Rng, RngCore};
//!
//! // A light is on or off; toggling flips it, sensing reports it with some noise
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Switch { Toggle, Sense }
//! impl Action for Switch {}
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Reading { On, Off, Nothing }
//! impl Observation for Reading {}
//!
//! struct Light;
//!
//! impl Pomdp for Light {
//!     type State = bool;
//!     type Action = Switch;
//!     type Observation = Reading;
//!
//!     fn actions(&self, _: Option<&bool>, _: &[(Switch, Reading)]) -> Vec<Switch> {
//!         vec![Switch::Toggle, Switch::Sense]
//!     }
//!
//!     fn sample(&self, on: &bool, action: &Switch, rng: &mut dyn RngCore) -> Transition<bool, Reading> {
//!         match action {
//!             Switch::Toggle => Transition {
//!                 next_state: !on,
//!                 observation: Reading::Nothing,
//!                 reward: if *on { 0.0 } else { 1.0 },
//!             },
//!             Switch::Sense => {
//!                 let truthful = rng.gen_bool(0.85);
//!                 let reading = if *on == truthful { Reading::On } else { Reading::Off };
//!                 Transition { next_state: *on, observation: reading, reward: -0.1 }
//!             }
//!         }
//!     }
//! }
//!
//! fn main() -> Result<(), arboriter_pomcp::PomcpError> {
//!     let belief: Particles<bool> = (0..100).map(|i| i % 2 == 0).collect();
//!     let mut agent = Agent::new(Light, Belief::Particles(belief));
//!
//!     let config = PlannerConfig::default()
//!         .with_max_depth(3)
//!         .with_max_simulations(200)
//!         .with_seed(42);
//!     let mut planner = Pomcp::new(config)?;
//!
//!     let action = planner.plan(&mut agent)?;
//!     println!("Search statistics: {}", planner.statistics().summary());
//!
//!     // Act in the real world, then tell the agent and the planner what happened
//!     let observation = match action {
//!         Switch::Toggle => Reading::Nothing,
//!         Switch::Sense => Reading::On,
//!     };
//!     agent.update_history(action, observation);
//!     match planner.update(&mut agent, &action, &observation) {
//!         Ok(()) => println!("Belief now holds {} particles", agent.belief().as_particles()?.len()),
//!         Err(e) => println!("Belief lost: {}", e),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! Each simulation draws a hidden state from the root's belief and walks the
//! tree of histories:
//!
//! 1. **Selection**: at each value node pick an action by UCB1 and sample the
//!    model for the next state, observation and reward.
//! 2. **Expansion**: the first time a history is reached, create its node with
//!    one action child per available action.
//! 3. **Rollout**: from a new node, follow the rollout policy to the horizon.
//! 4. **Backpropagation**: fold the discounted return into the action values
//!    along the path.
//!
//! POMCP additionally stores, in every depth-1 node, the states simulations
//! reached there. When the real observation arrives, that node becomes the
//! new root and its states are the new belief.

pub mod agent;
pub mod belief;
pub mod config;
pub mod policy;
pub mod pomcp;
pub mod pomdp;
pub mod pouct;
pub mod reinvigoration;
pub mod search;
pub mod stats;
pub mod tree;
pub mod utils;

pub use agent::Agent;
pub use belief::{Belief, BeliefKind, Histogram, Particles};
pub use config::PlannerConfig;
pub use policy::{ActionPrior, RolloutPolicy, SelectionPolicy};
pub use pomcp::Pomcp;
pub use pomdp::{Action, History, Observation, Pomdp, Transition};
pub use pouct::Pouct;
pub use stats::SearchStatistics;
pub use tree::{ChildSlot, QNode, RootNode, VNode};

/// Error types for planning
#[derive(thiserror::Error, Debug)]
pub enum PomcpError {
    /// The belief is not in the representation the planner needs
    #[error("Belief is represented as {found}, expected {expected}; convert it first")]
    RepresentationMismatch {
        /// Representation the planner requires
        expected: BeliefKind,
        /// Representation the agent holds
        found: BeliefKind,
    },

    /// No particle is left to continue the belief from
    #[error("Particle deprivation: {0}")]
    ParticleDeprivation(String),

    /// The belief has no state to sample
    #[error("Belief has no state to sample")]
    EmptyBelief,

    /// A node that must be built from an agent was requested without one
    #[error("Missing context: {0}")]
    MissingContext(String),

    /// The agent's tree was built for a different history
    #[error("Unable to plan for the given history: the tree was built for another one")]
    HistoryMismatch,

    /// No action is available at the root
    #[error("No actions available at the root")]
    NoActions,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for planning operations
pub type Result<T> = std::result::Result<T, PomcpError>;

/// An online planner driven by an agent-environment loop
///
/// The loop calls [`Planner::plan`], executes the action, appends the real
/// step to the agent's history and then calls [`Planner::update`].
pub trait Planner<P: Pomdp> {
    /// Chooses an action for the agent's current history
    fn plan(&mut self, agent: &mut Agent<P>) -> Result<P::Action>;

    /// Advances the planner's state past a real step
    fn update(
        &mut self,
        agent: &mut Agent<P>,
        real_action: &P::Action,
        real_observation: &P::Observation,
    ) -> Result<()>;

    /// True if [`Planner::update`] also updates the agent's belief
    fn updates_agent_belief(&self) -> bool;

    /// Statistics of the most recent search
    fn statistics(&self) -> &SearchStatistics;
}
