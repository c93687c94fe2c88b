//! Particle reinvigoration
//!
//! After a real step the planner is left with the particles that survived the
//! real action and observation. Their number is usually smaller than the
//! population the episode started with, and repeated steps would starve the
//! belief. Reinvigoration restores the population by resampling survivors,
//! optionally perturbing each synthesized particle with a domain transform.

use log::info;
use rand::Rng;

use crate::{belief::Particles, PomcpError, Result};

/// A domain-specific perturbation applied to synthesized particles
pub type StateTransform<'a, S> = &'a dyn Fn(S) -> S;

/// The outcome of a reinvigoration call
#[derive(Debug, Clone, PartialEq)]
pub struct Reinvigoration<S> {
    /// The restored belief
    pub particles: Particles<S>,

    /// Number of particles added on top of the survivors
    pub synthesized: usize,
}

/// Restores `particles` to at least `target` particles
///
/// The survivors are kept as they are. Missing particles are drawn uniformly
/// with replacement from the survivors and passed through `transform` when one
/// is given. A belief already at or above the target is returned unchanged;
/// this never down-samples.
///
/// # Errors
///
/// Returns [`PomcpError::ParticleDeprivation`] if `particles` is empty.
///
/// # Example
///
/// ```
/// use arboriter_pomcp::{belief::Particles, reinvigoration::reinvigorate};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let survivors: Particles<i32> = vec![1, 2].into();
/// let mut rng = StdRng::seed_from_u64(0);
/// let jitter: &dyn Fn(i32) -> i32 = &|s| s * 10;
///
/// let restored = reinvigorate(&survivors, 5, Some(jitter), &mut rng).unwrap();
/// assert_eq!(restored.particles.len(), 5);
/// assert_eq!(restored.synthesized, 3);
/// ```
pub fn reinvigorate<S, R>(
    particles: &Particles<S>,
    target: usize,
    transform: Option<StateTransform<'_, S>>,
    rng: &mut R,
) -> Result<Reinvigoration<S>>
where
    S: Clone,
    R: Rng + ?Sized,
{
    if particles.is_empty() {
        return Err(PomcpError::ParticleDeprivation(
            "no surviving particles to reinvigorate from".to_string(),
        ));
    }

    let mut restored = particles.clone();
    if restored.len() >= target {
        return Ok(Reinvigoration {
            particles: restored,
            synthesized: 0,
        });
    }

    let synthesized = target - restored.len();
    info!("Particle reinvigoration for {} particles", synthesized);

    while restored.len() < target {
        // Drawn from the survivors only, never from earlier synthesized particles
        let Some(seed) = particles.random(rng) else {
            break;
        };
        let state = match transform {
            Some(transform) => transform(seed.clone()),
            None => seed.clone(),
        };
        restored.add(state);
    }

    Ok(Reinvigoration {
        particles: restored,
        synthesized,
    })
}
