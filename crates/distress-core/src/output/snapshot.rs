//! Snapshot Generation
//!
//! Converts the live network into the shared snapshot schema.

use distress_events::{EdgeSnapshot, NetworkSnapshot, NodeSnapshot};

use crate::components::Network;

/// Captures every graph node (stateless ones included) and every edge.
pub fn network_snapshot(network: &Network, step: usize) -> NetworkSnapshot {
    let nodes = network
        .graph()
        .node_ids()
        .map(|id| match network.state(id) {
            Some(state) => NodeSnapshot::stateful(id.0, state.distress, state.app)
                .with_counters(state.distress_count, state.app_count)
                .with_logs(state.talking.len(), state.trust.len()),
            None => NodeSnapshot::stateless(id.0),
        })
        .collect();
    let edges = network
        .graph()
        .edges()
        .map(|(a, b)| EdgeSnapshot {
            source: a.0,
            target: b.0,
        })
        .collect();
    NetworkSnapshot::new(step, nodes, edges)
}
