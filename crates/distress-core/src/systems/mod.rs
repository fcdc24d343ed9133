//! ECS Systems
//!
//! Probability curves and the per-step diffusion pipeline.

pub mod diffusion;
pub mod probability;

pub use diffusion::{
    advance, diffuse, freeze_app_users, record_metrics, step, AppUserSnapshot, StepOutcome,
    StepTally,
};
pub use probability::{chance, consistency, global_proof, local_liking, willingness};
