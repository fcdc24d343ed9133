//! Shared snapshot and series types for the distress diffusion simulator.
//!
//! This crate contains pure data structures with no simulation logic.
//! Renderers, plotting tools and the core engine all speak these types.

pub mod series;
pub mod snapshot;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

pub use series::SeriesReport;
pub use snapshot::{
    generate_snapshot_id, EdgeSnapshot, NetworkCounts, NetworkSnapshot, NodeColor, NodeSnapshot,
};
