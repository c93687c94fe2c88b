use arboriter_pomcp::{Belief, BeliefKind, Histogram, Particles, PomcpError};
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn test_particles_add_and_len() {
    let mut belief = Particles::new();
    assert!(belief.is_empty());

    belief.add(3);
    belief.add(3);
    belief.add(7);

    assert_eq!(belief.len(), 3);
    assert_eq!(belief.count(&3), 2);
    assert_eq!(belief.count(&7), 1);
    assert_eq!(belief.count(&9), 0);
}

#[test]
fn test_random_draws_members() {
    let belief: Particles<u32> = vec![1, 2, 3].into();
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..100 {
        let drawn = belief.random(&mut rng).copied();
        assert!(matches!(drawn, Some(1..=3)));
    }
}

#[test]
fn test_random_on_empty_belief() {
    let belief: Particles<u32> = Particles::new();
    let mut rng = StdRng::seed_from_u64(3);

    assert!(belief.random(&mut rng).is_none());
}

#[test]
fn test_copies_are_independent() {
    let original: Particles<Vec<u8>> = vec![vec![1u8], vec![2u8]].into();
    let mut copy = original.clone();

    copy.add(vec![3]);

    assert_eq!(original.len(), 2);
    assert_eq!(copy.len(), 3);
    assert_eq!(original, Particles::from(vec![vec![1u8], vec![2u8]]));
}

#[test]
fn test_belief_discriminant() {
    let particles: Belief<u8> = Belief::Particles(vec![0, 1].into());
    let histogram: Belief<u8> = Belief::Histogram(Histogram::new(vec![(0, 0.5), (1, 0.5)]));

    assert_eq!(particles.kind(), BeliefKind::Particles);
    assert_eq!(histogram.kind(), BeliefKind::Histogram);
    assert_eq!(particles.as_particles().unwrap().len(), 2);

    match histogram.as_particles() {
        Err(PomcpError::RepresentationMismatch { expected, found }) => {
            assert_eq!(expected, BeliefKind::Particles);
            assert_eq!(found, BeliefKind::Histogram);
        }
        other => panic!("Expected a representation mismatch, got {:?}", other),
    }
}

#[test]
fn test_histogram_sampling_respects_weights() {
    let histogram = Histogram::new(vec![('a', 0.0), ('b', 1.0)]);
    let mut rng = StdRng::seed_from_u64(9);

    for _ in 0..50 {
        assert_eq!(histogram.sample(&mut rng), Some(&'b'));
    }
}

#[test]
fn test_histogram_to_particles() {
    let histogram = Histogram::new(vec![("left", 3.0), ("right", 1.0)]);
    let mut rng = StdRng::seed_from_u64(5);

    let particles = histogram.to_particles(400, &mut rng);

    assert_eq!(particles.len(), 400);
    assert!(particles.iter().all(|s| *s == "left" || *s == "right"));
    // Weighted 3:1, so "left" should clearly dominate
    assert!(particles.count(&"left") > particles.count(&"right"));
}

#[test]
fn test_histogram_without_weight_yields_nothing() {
    let histogram = Histogram::new(vec![(1, 0.0), (2, 0.0)]);
    let mut rng = StdRng::seed_from_u64(5);

    assert!(histogram.sample(&mut rng).is_none());
    assert!(histogram.to_particles(10, &mut rng).is_empty());
}
