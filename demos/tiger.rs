//! Tiger example for the POMCP planner
//!
//! A tiger hides behind one of two doors. The agent can listen, which is
//! cheap but noisy, or open a door: a reward behind the free one, a tiger
//! behind the other. This example runs a few episodes against a simulated
//! world and prints the planner's choices and belief after every step.
//!
//! Run with `RUST_LOG=info` to see the tree reuse and reinvigoration logs.

use std::fmt;

use arboriter_pomcp::{
    policy::rollout::RandomRollout, Action, Agent, Belief, Observation, Particles, PlannerConfig,
    Pomcp, Pomdp, Transition,
};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

fn main() {
    // Initialize logging
    env_logger::init();

    println!("POMCP Tiger Example");
    println!("===================");
    println!();

    let problem = TigerProblem { accuracy: 0.85 };
    let config = PlannerConfig::default()
        .with_max_depth(10)
        .with_discount_factor(0.95)
        .with_max_simulations(5_000)
        .with_seed(2024);

    let mut world_rng = StdRng::seed_from_u64(7);
    let mut total_reward = 0.0;

    for episode in 1..=3 {
        let tiger = if world_rng.gen_bool(0.5) { Door::Left } else { Door::Right };
        println!("Episode {}: the tiger is behind the {} door", episode, tiger);

        match run_episode(&problem, config.clone(), tiger, &mut world_rng) {
            Ok(reward) => {
                println!("Episode reward: {:.1}", reward);
                total_reward += reward;
            }
            Err(e) => println!("Error: {}", e),
        }
        println!();
    }

    println!("Total reward over 3 episodes: {:.1}", total_reward);
}

/// Plays until a door is opened or the step limit is hit
fn run_episode(
    problem: &TigerProblem,
    config: PlannerConfig,
    tiger: Door,
    world_rng: &mut StdRng,
) -> Result<f64, arboriter_pomcp::PomcpError> {
    let belief: Particles<Door> = (0..1_000)
        .map(|i| if i % 2 == 0 { Door::Left } else { Door::Right })
        .collect();
    let mut agent = Agent::new(problem.clone(), Belief::Particles(belief));
    let mut planner = Pomcp::new(config)?.with_rollout_policy(RandomRollout::new());

    let mut state = tiger;
    let mut total = 0.0;

    for step in 1..=10 {
        println!("AI is thinking...");
        let action = planner.plan(&mut agent)?;
        let outcome = problem.sample(&state, &action, world_rng);

        println!(
            "Step {}: {:?} -> {:?} (reward {:.1})",
            step, action, outcome.observation, outcome.reward
        );
        println!("{}", planner.statistics().summary());

        total += outcome.reward;
        if action != Choice::Listen {
            return Ok(total);
        }

        state = outcome.next_state;
        agent.update_history(action, outcome.observation);
        planner.update(&mut agent, &action, &outcome.observation)?;

        let particles = agent.belief().as_particles()?;
        println!(
            "Belief: {} particles, {:.0}% on the left door",
            particles.len(),
            100.0 * particles.count(&Door::Left) as f64 / particles.len() as f64
        );
    }

    Ok(total)
}

/// Where the tiger is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Door {
    Left,
    Right,
}

impl fmt::Display for Door {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Door::Left => write!(f, "left"),
            Door::Right => write!(f, "right"),
        }
    }
}

/// What the agent can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Listen,
    OpenLeft,
    OpenRight,
}

impl Action for Choice {}

/// What the agent hears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Growl {
    Left,
    Right,
    Silence,
}

impl Observation for Growl {}

/// Tiger problem with a configurable listening accuracy
#[derive(Debug, Clone)]
struct TigerProblem {
    accuracy: f64,
}

impl Pomdp for TigerProblem {
    type State = Door;
    type Action = Choice;
    type Observation = Growl;

    fn actions(&self, _state: Option<&Door>, _history: &[(Choice, Growl)]) -> Vec<Choice> {
        vec![Choice::Listen, Choice::OpenLeft, Choice::OpenRight]
    }

    fn sample(&self, tiger: &Door, action: &Choice, rng: &mut dyn RngCore) -> Transition<Door, Growl> {
        match action {
            Choice::Listen => {
                let truthful = rng.gen_bool(self.accuracy);
                let growl = match (tiger, truthful) {
                    (Door::Left, true) | (Door::Right, false) => Growl::Left,
                    _ => Growl::Right,
                };
                Transition {
                    next_state: *tiger,
                    observation: growl,
                    reward: -1.0,
                }
            }
            Choice::OpenLeft | Choice::OpenRight => {
                let opened = if *action == Choice::OpenLeft { Door::Left } else { Door::Right };
                // The tiger is moved behind a random door for the next round
                let next_state = if rng.gen_bool(0.5) { Door::Left } else { Door::Right };
                Transition {
                    next_state,
                    observation: Growl::Silence,
                    reward: if opened == *tiger { -100.0 } else { 10.0 },
                }
            }
        }
    }
}
