//! Pluggable policies used by the search
//!
//! This module contains the policies the search engine is parameterized by:
//! - Selection policies: how to choose an action during tree descent
//! - Rollout policies: how to choose actions beyond the tree frontier
//! - Action priors: how to seed action statistics at expansion

pub mod prior;
pub mod rollout;
pub mod selection;

pub use prior::{ActionPrior, Preference, PriorContext};
pub use rollout::{FnRollout, RandomRollout, RolloutPolicy};
pub use selection::{SelectionPolicy, UCB1Policy};
