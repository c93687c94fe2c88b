//! Configuration options for the planners
//!
//! This module defines the configuration parameters that control the search
//! budget, the horizon and the statistics used by PO-UCT and POMCP.

use std::time::Duration;

use crate::{PomcpError, Result};

/// Criteria for selecting the action to return after search is complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestChildCriteria {
    /// Select the action with the most visits
    ///
    /// More robust when value estimates are noisy.
    MostVisits,

    /// Select the action with the highest estimated value
    ///
    /// This is the standard rule for PO-UCT and POMCP and the default.
    HighestValue,
}

/// Configuration for the planners
///
/// Use the builder methods to create a customized configuration.
///
/// # Example
///
/// ```
/// use arboriter_pomcp::{PlannerConfig, config::BestChildCriteria};
/// use std::time::Duration;
///
/// let config = PlannerConfig::default()
///     .with_max_depth(10)
///     .with_max_simulations(2_000)
///     .with_max_time(Duration::from_millis(500))
///     .with_discount_factor(0.95)
///     .with_seed(7)
///     .with_best_child_criteria(BestChildCriteria::MostVisits);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum depth of a simulated trajectory
    ///
    /// Both tree descent and rollout stop at this many steps from the root.
    pub max_depth: usize,

    /// Maximum number of simulations per call to `plan`
    ///
    /// Zero means the time budget alone bounds the search.
    pub max_simulations: usize,

    /// Maximum wall-clock time per call to `plan`
    pub max_time: Option<Duration>,

    /// Discount applied to future rewards, in (0, 1]
    pub discount_factor: f64,

    /// Exploration constant for UCB1
    ///
    /// The standard value is sqrt(2).
    pub exploration_constant: f64,

    /// Visit count given to a freshly created action node
    pub num_visits_init: u64,

    /// Value given to a freshly created action node
    pub value_init: f64,

    /// Criteria for selecting the returned action
    pub best_child_criteria: BestChildCriteria,

    /// Seed for the planner's random number generator
    ///
    /// `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            max_depth: 5,
            max_simulations: 1_000,
            max_time: None,
            discount_factor: 0.9,
            exploration_constant: std::f64::consts::SQRT_2,
            num_visits_init: 1,
            value_init: 0.0,
            best_child_criteria: BestChildCriteria::HighestValue,
            seed: None,
        }
    }
}

impl PlannerConfig {
    /// Sets the maximum trajectory depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the maximum number of simulations
    pub fn with_max_simulations(mut self, simulations: usize) -> Self {
        self.max_simulations = simulations;
        self
    }

    /// Sets the maximum time to run the search
    pub fn with_max_time(mut self, duration: Duration) -> Self {
        self.max_time = Some(duration);
        self
    }

    /// Sets the discount factor
    pub fn with_discount_factor(mut self, discount: f64) -> Self {
        self.discount_factor = discount;
        self
    }

    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the initial visit count and value of new action nodes
    pub fn with_node_init(mut self, num_visits: u64, value: f64) -> Self {
        self.num_visits_init = num_visits;
        self.value_init = value;
        self
    }

    /// Sets the criteria for selecting the returned action
    pub fn with_best_child_criteria(mut self, criteria: BestChildCriteria) -> Self {
        self.best_child_criteria = criteria;
        self
    }

    /// Seeds the planner's random number generator
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the configuration describes a usable search
    pub fn validate(&self) -> Result<()> {
        if !(self.discount_factor > 0.0 && self.discount_factor <= 1.0) {
            return Err(PomcpError::InvalidConfiguration(format!(
                "discount factor must lie in (0, 1], got {}",
                self.discount_factor
            )));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(PomcpError::InvalidConfiguration(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if self.max_depth == 0 {
            return Err(PomcpError::InvalidConfiguration(
                "max depth must be at least 1".to_string(),
            ));
        }
        if self.max_simulations == 0 && self.max_time.is_none() {
            return Err(PomcpError::InvalidConfiguration(
                "either a simulation or a time budget is required".to_string(),
            ));
        }
        Ok(())
    }
}
