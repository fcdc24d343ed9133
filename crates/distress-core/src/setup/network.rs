//! Network Construction
//!
//! Second construction pass (edges and state records) and the one-off
//! perturbation that reshapes the topology before a run.

use rand::Rng;

use crate::components::{Network, NodeId, NodeState};
use crate::config::{AllocationPolicy, PerturbationConfig, RateConfig};
use crate::error::SimError;
use crate::systems::probability::chance;

use super::ego::AdjacencySource;

/// Draws the initial record for a newly allocated node.
///
/// One draw decides distress; a distressed node draws once more to decide
/// whether it starts on the app.
pub fn initial_state<R: Rng + ?Sized>(rates: &RateConfig, rng: &mut R) -> NodeState {
    if chance(rng, rates.base_distress_rate) {
        let app = chance(rng, rates.local_liking(0));
        NodeState::new(true, app)
    } else {
        NodeState::new(false, false)
    }
}

/// Inserts every non-self edge and returns the ids owed a state record, in
/// the order they were first met.
fn plan_allocation(
    network: &mut Network,
    sources: &[AdjacencySource],
    policy: AllocationPolicy,
) -> Vec<NodeId> {
    let mut planned = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for source in sources {
        for entry in &source.entries {
            for &neighbor in &entry.neighbors {
                if neighbor == entry.anchor {
                    continue;
                }
                network.insert_edge(entry.anchor, neighbor);
                if policy == AllocationPolicy::AllEndpoints && seen.insert(entry.anchor) {
                    planned.push(entry.anchor);
                }
                if seen.insert(neighbor) {
                    planned.push(neighbor);
                }
            }
        }
    }
    planned
}

/// Builds the network from parsed sources.
///
/// Fails with [`SimError::EmptyNetwork`] when no non-self edge exists, since
/// the diffusion step divides by the node count.
pub fn build_network<R: Rng + ?Sized>(
    sources: &[AdjacencySource],
    rates: &RateConfig,
    policy: AllocationPolicy,
    rng: &mut R,
) -> Result<Network, SimError> {
    let mut network = Network::new();
    let planned = plan_allocation(&mut network, sources, policy);
    if network.node_count() == 0 {
        return Err(SimError::EmptyNetwork);
    }

    for id in planned {
        let state = initial_state(rates, rng);
        network.allocate(id, state);
    }

    tracing::info!(
        nodes = network.node_count(),
        edges = network.graph().edge_count(),
        stateful = network.stateful_count(),
        distressed = network.distressed_count(),
        app_users = network.app_user_count(),
        ?policy,
        "Built network"
    );
    Ok(network)
}

/// Outcome of the perturbation pass
#[derive(Debug, Clone, PartialEq)]
pub struct PerturbationSummary {
    pub edges_removed: usize,
    pub edges_added: usize,
    pub average_clustering: f64,
}

/// Removes a share of edges, then adds random ones, then measures clustering.
pub fn perturb_network<R: Rng + ?Sized>(
    network: &mut Network,
    config: &PerturbationConfig,
    rng: &mut R,
) -> PerturbationSummary {
    let edges_removed = network
        .graph
        .remove_random_edges(config.edge_removal_fraction, rng);
    let attempts = (network.node_count() as f64 * config.edge_addition_fraction).floor() as usize;
    let edges_added = network.graph.add_random_edges(attempts, rng);
    let average_clustering = network.graph.average_clustering();

    tracing::info!(
        edges_removed,
        edges_added,
        edges = network.graph.edge_count(),
        clustering = average_clustering,
        "Perturbed network"
    );
    PerturbationSummary {
        edges_removed,
        edges_added,
        average_clustering,
    }
}
