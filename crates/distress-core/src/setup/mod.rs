//! Network Setup
//!
//! Reading ego files, building the network and perturbing its topology.

pub mod ego;
pub mod network;

pub use ego::{parse_adjacency, read_ego_file, read_ego_files, AdjacencyEntry, AdjacencySource};
pub use network::{build_network, initial_state, perturb_network, PerturbationSummary};
