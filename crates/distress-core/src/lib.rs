//! Distress Diffusion Simulation Engine Library
//!
//! Public API for building a social network from ego files, perturbing it,
//! and running the distress / app-adoption diffusion over it.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod error;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::*;
pub use config::{AllocationPolicy, ConfigError, PerturbationConfig, RateConfig, SimConfig};
pub use error::{ParseError, SimError};
pub use simulation::Simulation;

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
