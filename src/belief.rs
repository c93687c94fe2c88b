//! Belief representations
//!
//! A belief is a probability distribution over hidden states. The planner in
//! this crate works on [`Particles`], a uniformly weighted multiset of sampled
//! states where the weight of a state is implicit in how often it occurs.
//! [`Belief`] tags the representation explicitly so a planner can reject
//! beliefs it cannot use with a typed error instead of guessing.

use std::fmt;

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::{PomcpError, Result};

/// A particle belief: sampled states with uniform weight
///
/// Cloning a `Particles` value produces an independent copy; no buffer is
/// ever shared between two beliefs.
#[derive(Debug, Clone, PartialEq)]
pub struct Particles<S> {
    particles: Vec<S>,
}

impl<S> Particles<S> {
    /// Creates an empty belief
    pub fn new() -> Self {
        Particles {
            particles: Vec::new(),
        }
    }

    /// Appends a particle
    pub fn add(&mut self, state: S) {
        self.particles.push(state);
    }

    /// Draws a particle uniformly at random, or `None` if the belief is empty
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&S> {
        self.particles.choose(rng)
    }

    /// Number of particles, counting duplicates
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns true if the belief holds no particles
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Iterates over all particles in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.particles.iter()
    }

    /// Number of particles equal to `state`
    pub fn count(&self, state: &S) -> usize
    where
        S: PartialEq,
    {
        self.particles.iter().filter(|p| *p == state).count()
    }
}

impl<S> Default for Particles<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> From<Vec<S>> for Particles<S> {
    fn from(particles: Vec<S>) -> Self {
        Particles { particles }
    }
}

impl<S> FromIterator<S> for Particles<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Particles {
            particles: iter.into_iter().collect(),
        }
    }
}

impl<S> Extend<S> for Particles<S> {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.particles.extend(iter);
    }
}

impl<S> IntoIterator for Particles<S> {
    type Item = S;
    type IntoIter = std::vec::IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.into_iter()
    }
}

impl<'a, S> IntoIterator for &'a Particles<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}

/// A belief given as explicit (state, weight) pairs
///
/// Weights need not be normalized. POMCP cannot plan over this representation
/// directly; convert it with [`Histogram::to_particles`] first.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram<S> {
    entries: Vec<(S, f64)>,
}

impl<S> Histogram<S> {
    /// Creates a histogram from (state, weight) pairs
    pub fn new(entries: Vec<(S, f64)>) -> Self {
        Histogram { entries }
    }

    /// The (state, weight) pairs
    pub fn entries(&self) -> &[(S, f64)] {
        &self.entries
    }

    /// Samples a state proportionally to its weight
    ///
    /// Returns `None` if the histogram is empty or no weight is positive.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&S> {
        let dist = WeightedIndex::new(self.entries.iter().map(|(_, w)| *w)).ok()?;
        Some(&self.entries[dist.sample(rng)].0)
    }

    /// Draws `count` independent samples into a particle belief
    pub fn to_particles<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Particles<S>
    where
        S: Clone,
    {
        let dist = match WeightedIndex::new(self.entries.iter().map(|(_, w)| *w)) {
            Ok(dist) => dist,
            Err(_) => return Particles::new(),
        };
        (0..count)
            .map(|_| self.entries[dist.sample(rng)].0.clone())
            .collect()
    }
}

/// Discriminant of a [`Belief`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeliefKind {
    /// Uniformly weighted sampled states
    Particles,
    /// Explicitly weighted states
    Histogram,
}

impl fmt::Display for BeliefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeliefKind::Particles => write!(f, "particles"),
            BeliefKind::Histogram => write!(f, "histogram"),
        }
    }
}

/// A belief in one of the supported representations
#[derive(Debug, Clone, PartialEq)]
pub enum Belief<S> {
    /// Particle representation, required by POMCP
    Particles(Particles<S>),
    /// Weighted representation
    Histogram(Histogram<S>),
}

impl<S> Belief<S> {
    /// Returns the representation tag
    pub fn kind(&self) -> BeliefKind {
        match self {
            Belief::Particles(_) => BeliefKind::Particles,
            Belief::Histogram(_) => BeliefKind::Histogram,
        }
    }

    /// Returns the particles, or a representation mismatch error
    pub fn as_particles(&self) -> Result<&Particles<S>> {
        match self {
            Belief::Particles(particles) => Ok(particles),
            other => Err(PomcpError::RepresentationMismatch {
                expected: BeliefKind::Particles,
                found: other.kind(),
            }),
        }
    }

    /// Mutable access to the particles, or a representation mismatch error
    pub fn as_particles_mut(&mut self) -> Result<&mut Particles<S>> {
        match self {
            Belief::Particles(particles) => Ok(particles),
            other => Err(PomcpError::RepresentationMismatch {
                expected: BeliefKind::Particles,
                found: other.kind(),
            }),
        }
    }

    /// Samples a state from either representation
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&S> {
        match self {
            Belief::Particles(particles) => particles.random(rng),
            Belief::Histogram(histogram) => histogram.sample(rng),
        }
    }
}

impl<S> From<Particles<S>> for Belief<S> {
    fn from(particles: Particles<S>) -> Self {
        Belief::Particles(particles)
    }
}

impl<S> From<Histogram<S>> for Belief<S> {
    fn from(histogram: Histogram<S>) -> Self {
        Belief::Histogram(histogram)
    }
}
