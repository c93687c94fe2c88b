//! Statistics collection for planning
//!
//! This module provides structures for collecting and reporting statistics
//! about searches and belief updates.

use std::time::Duration;

/// Statistics collected by a planner
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    /// Number of simulations performed by the last search
    pub simulations: usize,

    /// Time spent in the last search
    pub total_time: Duration,

    /// Number of value nodes in the tree after the last search
    pub tree_size: usize,

    /// Deepest tree level a simulation descended to in the last search
    pub max_depth: usize,

    /// Whether the last search was stopped by its time budget
    pub stopped_early: bool,

    /// Particles synthesized by reinvigoration over the planner's lifetime
    pub particles_synthesized: usize,
}

impl SearchStatistics {
    /// Creates a new, empty statistics object
    pub fn new() -> Self {
        SearchStatistics {
            simulations: 0,
            total_time: Duration::from_secs(0),
            tree_size: 1, // Start with root node
            max_depth: 0,
            stopped_early: false,
            particles_synthesized: 0,
        }
    }

    /// Clears the per-search counters, keeping lifetime counters
    pub fn reset_search(&mut self) {
        *self = SearchStatistics {
            particles_synthesized: self.particles_synthesized,
            ..SearchStatistics::new()
        };
    }

    /// Returns the average time per simulation in microseconds
    pub fn avg_time_per_simulation_us(&self) -> f64 {
        if self.simulations == 0 {
            return 0.0;
        }
        self.total_time.as_micros() as f64 / self.simulations as f64
    }

    /// Returns the number of simulations per second
    pub fn simulations_per_second(&self) -> f64 {
        if self.total_time.as_secs_f64() <= 0.0 {
            return 0.0;
        }
        self.simulations as f64 / self.total_time.as_secs_f64()
    }

    /// Returns a summary of the statistics as a string
    pub fn summary(&self) -> String {
        format!(
            "Search Statistics:\n\
             - Simulations: {}\n\
             - Total time: {:.3} seconds\n\
             - Tree size: {} nodes\n\
             - Max depth: {}\n\
             - Avg time per simulation: {:.3} µs\n\
             - Simulations per second: {:.1}\n\
             - Stopped early: {}\n\
             - Particles synthesized: {}",
            self.simulations,
            self.total_time.as_secs_f64(),
            self.tree_size,
            self.max_depth,
            self.avg_time_per_simulation_us(),
            self.simulations_per_second(),
            self.stopped_early,
            self.particles_synthesized
        )
    }
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}
