//! Simulation Driver
//!
//! Owns the ECS world holding the network, rates, random source and metrics,
//! and runs the step pipeline on a single-threaded schedule:
//! freeze app users, advance every node, record the step's counts.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use distress_events::SeriesReport;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::components::Network;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::output::metrics::MetricsCollector;
use crate::output::render::{render_isolated, StepRenderer};
use crate::setup::{build_network, perturb_network, AdjacencySource};
use crate::systems::diffusion::{
    diffuse, freeze_app_users, record_metrics, AppUserSnapshot, StepOutcome, StepTally,
};
use crate::SimRng;

/// Steps between progress lines in the log
const PROGRESS_INTERVAL: usize = 50;

/// A configured, ready-to-run simulation
pub struct Simulation {
    world: World,
    schedule: Schedule,
    iterations: usize,
    seed: u64,
}

impl Simulation {
    /// Wraps an already built network. `rng` continues the stream used to
    /// build it, so a seed reproduces construction and diffusion together.
    pub fn new(network: Network, config: &SimConfig, rng: SmallRng) -> Self {
        let mut metrics = MetricsCollector::new();
        metrics.record_initial(network.distressed_count());

        let mut world = World::new();
        world.insert_resource(network);
        world.insert_resource(config.rates.clone());
        world.insert_resource(SimRng(rng));
        world.insert_resource(AppUserSnapshot::default());
        world.insert_resource(StepTally::default());
        world.insert_resource(metrics);

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems((freeze_app_users, diffuse, record_metrics).chain());

        Self {
            world,
            schedule,
            iterations: config.simulation.iterations,
            seed: config.simulation.seed,
        }
    }

    /// Seeds the random source, builds and perturbs the network.
    pub fn from_sources(sources: &[AdjacencySource], config: &SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let mut rng = SmallRng::seed_from_u64(config.simulation.seed);
        let mut network = build_network(
            sources,
            &config.rates,
            config.simulation.allocation,
            &mut rng,
        )?;
        perturb_network(&mut network, &config.perturbation, &mut rng);
        Ok(Self::new(network, config, rng))
    }

    pub fn network(&self) -> &Network {
        self.world.resource::<Network>()
    }

    pub fn metrics(&self) -> &MetricsCollector {
        self.world.resource::<MetricsCollector>()
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn steps_run(&self) -> usize {
        self.world.resource::<StepTally>().steps
    }

    /// Runs one step of the pipeline and returns its counts.
    ///
    /// Steps taken after [`Simulation::run`] has finished land after the
    /// trailing user count in the series.
    pub fn step(&mut self) -> StepOutcome {
        self.schedule.run(&mut self.world);
        self.world
            .resource::<StepTally>()
            .last
            .clone()
            .unwrap_or_default()
    }

    /// Renders the starting state, runs every remaining iteration with a
    /// render after each, then closes the user series with a fresh count.
    ///
    /// A finished simulation just returns its report again.
    pub fn run(&mut self, renderer: &mut dyn StepRenderer) -> SeriesReport {
        if self.metrics().is_finished() {
            return self.report();
        }

        render_isolated(renderer, self.network(), self.steps_run());
        while self.steps_run() < self.iterations {
            let outcome = self.step();
            let step = self.steps_run();
            render_isolated(renderer, self.network(), step);

            if step % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    step,
                    of = self.iterations,
                    distressed = outcome.distressed,
                    app_users = outcome.app_users_at_start,
                    "Progress"
                );
            }
        }

        let app_users = self.network().app_user_count();
        self.world.resource_mut::<MetricsCollector>().finish(app_users);
        tracing::info!(
            steps = self.steps_run(),
            distressed = self.network().distressed_count(),
            app_users,
            "Simulation complete"
        );
        self.report()
    }

    pub fn report(&self) -> SeriesReport {
        self.metrics().to_report(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::render::NullRenderer;
    use crate::setup::parse_adjacency;

    fn config(iterations: usize) -> SimConfig {
        let mut config = SimConfig::default();
        config.simulation.iterations = iterations;
        config
    }

    fn ring(size: u64) -> Vec<AdjacencySource> {
        let text: String = (1..=size)
            .map(|i| format!("{}: {} {}\n", i, i % size + 1, (i + 1) % size + 1))
            .collect();
        vec![parse_adjacency("ring", &text).unwrap()]
    }

    #[test]
    fn test_series_lengths() {
        let mut sim = Simulation::from_sources(&ring(30), &config(12)).unwrap();
        let report = sim.run(&mut NullRenderer);

        assert_eq!(report.steps, 12);
        assert_eq!(report.distress_series.len(), 13);
        assert_eq!(report.user_series.len(), 13);
        assert_eq!(sim.steps_run(), 12);
    }

    #[test]
    fn test_run_is_one_shot() {
        let mut sim = Simulation::from_sources(&ring(10), &config(5)).unwrap();
        let first = sim.run(&mut NullRenderer);
        let second = sim.run(&mut NullRenderer);

        assert_eq!(first, second);
        assert_eq!(sim.steps_run(), 5);
    }

    #[test]
    fn test_series_match_network_counts() {
        let mut sim = Simulation::from_sources(&ring(25), &config(0)).unwrap();
        let initial = sim.network().distressed_count();
        let users_before = sim.network().app_user_count();

        let outcome = sim.step();
        assert_eq!(outcome.app_users_at_start, users_before);
        assert_eq!(outcome.distressed, sim.network().distressed_count());
        assert_eq!(sim.metrics().distress_series(), &[initial, outcome.distressed]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut bad = config(1);
        bad.rates.trust_rate = -0.5;
        assert!(matches!(
            Simulation::from_sources(&ring(5), &bad),
            Err(SimError::Config(_))
        ));
    }
}
