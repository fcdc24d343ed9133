//! Simulation Components
//!
//! Node state, topology, and the combined network resource.

pub mod network;
pub mod node;
pub mod topology;

pub use network::Network;
pub use node::{DistressTick, NodeId, NodeState};
pub use topology::SocialGraph;
