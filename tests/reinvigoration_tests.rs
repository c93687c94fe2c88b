use std::cell::Cell;

use arboriter_pomcp::{reinvigoration::reinvigorate, Particles, PomcpError};
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn test_belief_at_or_above_target_is_unchanged() {
    let survivors: Particles<i32> = vec![4, 4, 5, 6].into();
    let mut rng = StdRng::seed_from_u64(1);

    for target in [1, 3, 4] {
        let restored = reinvigorate(&survivors, target, None, &mut rng).unwrap();
        assert_eq!(restored.particles, survivors);
        assert_eq!(restored.synthesized, 0);
    }
}

#[test]
fn test_small_belief_is_topped_up_to_target() {
    let survivors: Particles<i32> = vec![1, 2, 3].into();
    let mut rng = StdRng::seed_from_u64(2);

    let restored = reinvigorate(&survivors, 20, None, &mut rng).unwrap();

    assert_eq!(restored.particles.len(), 20);
    assert_eq!(restored.synthesized, 17);

    // Survivors are kept first, in order
    let kept: Vec<_> = restored.particles.iter().take(3).copied().collect();
    assert_eq!(kept, vec![1, 2, 3]);

    // Every synthesized particle duplicates a survivor
    assert!(restored
        .particles
        .iter()
        .skip(3)
        .all(|s| survivors.count(s) > 0));
}

#[test]
fn test_transform_applies_to_synthesized_particles_only() {
    let survivors: Particles<i32> = vec![1, 2].into();
    let mut rng = StdRng::seed_from_u64(3);
    let calls = Cell::new(0);
    let jitter: &dyn Fn(i32) -> i32 = &|s| {
        calls.set(calls.get() + 1);
        s + 100
    };

    let restored = reinvigorate(&survivors, 10, Some(jitter), &mut rng).unwrap();

    assert_eq!(restored.particles.len(), 10);
    assert_eq!(calls.get(), 8);
    assert_eq!(restored.particles.count(&1), 1);
    assert_eq!(restored.particles.count(&2), 1);
    assert!(restored
        .particles
        .iter()
        .skip(2)
        .all(|s| *s == 101 || *s == 102));

    // The input belief is untouched
    assert_eq!(survivors, Particles::from(vec![1, 2]));
}

#[test]
fn test_synthesized_particles_come_from_survivors_only() {
    let survivors: Particles<i32> = vec![10].into();
    let mut rng = StdRng::seed_from_u64(4);
    let step: &dyn Fn(i32) -> i32 = &|s| s + 1;

    let restored = reinvigorate(&survivors, 6, Some(step), &mut rng).unwrap();

    // Each new particle is a perturbed survivor, never a perturbed copy of a new one
    assert!(restored.particles.iter().skip(1).all(|s| *s == 11));
}

#[test]
fn test_empty_belief_is_particle_deprivation() {
    let empty: Particles<i32> = Particles::new();
    let mut rng = StdRng::seed_from_u64(5);

    for target in 1..5 {
        let result = reinvigorate(&empty, target, None, &mut rng);
        assert!(matches!(result, Err(PomcpError::ParticleDeprivation(_))));
    }
}

#[test]
fn test_reinvigoration_is_idempotent_at_target() {
    let survivors: Particles<i32> = vec![7, 8].into();
    let mut rng = StdRng::seed_from_u64(6);

    let once = reinvigorate(&survivors, 12, None, &mut rng).unwrap();
    let twice = reinvigorate(&once.particles, 12, None, &mut rng).unwrap();

    assert_eq!(once.particles, twice.particles);
    assert_eq!(twice.synthesized, 0);
}
