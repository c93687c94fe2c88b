use arboriter_pomcp::{config::BestChildCriteria, PlannerConfig, PomcpError};
use std::time::Duration;

#[test]
fn test_config_builder_methods() {
    // Test that all builder methods correctly set their respective values
    let config = PlannerConfig::default()
        .with_exploration_constant(2.0)
        .with_max_simulations(5000)
        .with_max_time(Duration::from_secs(30))
        .with_max_depth(20)
        .with_discount_factor(0.95)
        .with_node_init(3, 1.5)
        .with_seed(11)
        .with_best_child_criteria(BestChildCriteria::MostVisits);

    // Verify each setting was applied correctly
    assert_eq!(config.exploration_constant, 2.0);
    assert_eq!(config.max_simulations, 5000);
    assert_eq!(config.max_time, Some(Duration::from_secs(30)));
    assert_eq!(config.max_depth, 20);
    assert_eq!(config.discount_factor, 0.95);
    assert_eq!(config.num_visits_init, 3);
    assert_eq!(config.value_init, 1.5);
    assert_eq!(config.seed, Some(11));
    assert_eq!(config.best_child_criteria, BestChildCriteria::MostVisits);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_default_values() {
    let config = PlannerConfig::default();

    // Default exploration constant should be sqrt(2)
    assert!((config.exploration_constant - 1.414).abs() < 0.001);
    assert_eq!(config.max_depth, 5);
    assert_eq!(config.max_simulations, 1_000);
    assert_eq!(config.max_time, None);
    assert_eq!(config.discount_factor, 0.9);
    assert_eq!(config.num_visits_init, 1);
    assert_eq!(config.value_init, 0.0);
    assert_eq!(config.seed, None);
    assert_eq!(config.best_child_criteria, BestChildCriteria::HighestValue);
    assert!(config.validate().is_ok());
}

#[test]
fn test_discount_factor_bounds() {
    for discount in [0.0, -0.5, 1.01, f64::NAN] {
        let config = PlannerConfig::default().with_discount_factor(discount);
        assert!(matches!(
            config.validate(),
            Err(PomcpError::InvalidConfiguration(_))
        ));
    }

    // An undiscounted search is allowed
    assert!(PlannerConfig::default()
        .with_discount_factor(1.0)
        .validate()
        .is_ok());
}

#[test]
fn test_exploration_constant_bounds() {
    for constant in [-1.0, f64::INFINITY, f64::NAN] {
        let config = PlannerConfig::default().with_exploration_constant(constant);
        assert!(config.validate().is_err());
    }

    // Pure exploitation is allowed
    assert!(PlannerConfig::default()
        .with_exploration_constant(0.0)
        .validate()
        .is_ok());
}

#[test]
fn test_search_needs_depth_and_budget() {
    assert!(PlannerConfig::default().with_max_depth(0).validate().is_err());
    assert!(PlannerConfig::default()
        .with_max_simulations(0)
        .validate()
        .is_err());

    // A time budget alone is enough
    assert!(PlannerConfig::default()
        .with_max_simulations(0)
        .with_max_time(Duration::from_millis(5))
        .validate()
        .is_ok());
}
