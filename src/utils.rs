//! Utility functions for the search
//!
//! This module contains small numeric helpers used throughout the planner.

/// Calculates the exploration term for UCB1
///
/// The parent count is offset by one so that a parent with no recorded
/// visits still yields a finite bonus.
pub fn exploration_term(parent_visits: u64, child_visits: u64, exploration_constant: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }

    exploration_constant * (((parent_visits + 1) as f64).ln() / child_visits as f64).sqrt()
}

/// Calculates the UCB1 value for an action
///
/// UCB1 balances exploitation (using known good actions) with exploration
/// (trying less-visited actions that might be better).
pub fn ucb1_value(value: f64, visits: u64, parent_visits: u64, exploration_constant: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }

    value + exploration_term(parent_visits, visits, exploration_constant)
}
