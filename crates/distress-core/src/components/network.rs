//! Network Resource
//!
//! The topology together with the node state model. State records live in
//! slots parallel to the graph's node slots; graph nodes without a record
//! hold `None`.

use bevy_ecs::prelude::*;

use super::node::{NodeId, NodeState};
use super::topology::SocialGraph;

/// Resource: graph plus per-node state
#[derive(Resource, Debug, Clone, Default)]
pub struct Network {
    pub(crate) graph: SocialGraph,
    pub(crate) states: Vec<Option<NodeState>>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &SocialGraph {
        &self.graph
    }

    /// Inserts an undirected edge. Returns false for self-loops and duplicates.
    pub fn insert_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        let inserted = self.graph.add_edge(a, b);
        self.sync_slots();
        inserted
    }

    fn sync_slots(&mut self) {
        if self.states.len() < self.graph.node_count() {
            self.states.resize(self.graph.node_count(), None);
        }
    }

    /// Gives a graph node its state record unless it already has one.
    ///
    /// Returns false when the node is unknown or already allocated.
    pub fn allocate(&mut self, id: NodeId, state: NodeState) -> bool {
        let Some(slot) = self.graph.slot_of(id) else {
            return false;
        };
        match self.states.get_mut(slot) {
            Some(entry) if entry.is_none() => {
                *entry = Some(state);
                true
            }
            _ => false,
        }
    }

    pub fn has_state(&self, id: NodeId) -> bool {
        self.state(id).is_some()
    }

    pub fn state(&self, id: NodeId) -> Option<&NodeState> {
        let slot = self.graph.slot_of(id)?;
        self.states.get(slot)?.as_ref()
    }

    pub fn state_mut(&mut self, id: NodeId) -> Option<&mut NodeState> {
        let slot = self.graph.slot_of(id)?;
        self.states.get_mut(slot)?.as_mut()
    }

    /// Nodes with a state record, in traversal order.
    pub fn states(&self) -> impl Iterator<Item = (NodeId, &NodeState)> + '_ {
        self.states.iter().enumerate().filter_map(move |(slot, state)| {
            let state = state.as_ref()?;
            Some((self.graph.id_at(slot)?, state))
        })
    }

    /// Number of graph nodes, with or without state.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn stateful_count(&self) -> usize {
        self.states.iter().flatten().count()
    }

    pub fn distressed_count(&self) -> usize {
        self.states.iter().flatten().filter(|s| s.distress).count()
    }

    pub fn app_user_count(&self) -> usize {
        self.states.iter().flatten().filter(|s| s.app).count()
    }

    /// IDs of app users in traversal order.
    pub fn app_user_ids(&self) -> Vec<NodeId> {
        self.states().filter(|(_, s)| s.app).map(|(id, _)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_once() {
        let mut network = Network::new();
        network.insert_edge(NodeId(1), NodeId(2));

        assert!(network.allocate(NodeId(2), NodeState::new(true, false)));
        assert!(!network.allocate(NodeId(2), NodeState::new(false, true)));
        assert!(!network.allocate(NodeId(99), NodeState::default()));

        let state = network.state(NodeId(2)).unwrap();
        assert!(state.distress, "second allocation must not overwrite");
        assert!(!network.has_state(NodeId(1)));
    }

    #[test]
    fn test_counts_and_app_users() {
        let mut network = Network::new();
        network.insert_edge(NodeId(1), NodeId(2));
        network.insert_edge(NodeId(2), NodeId(3));
        network.allocate(NodeId(3), NodeState::new(true, true));
        network.allocate(NodeId(2), NodeState::new(false, true));

        assert_eq!(network.node_count(), 3);
        assert_eq!(network.stateful_count(), 2);
        assert_eq!(network.distressed_count(), 1);
        assert_eq!(network.app_user_count(), 2);
        // Traversal follows graph order, not allocation order.
        assert_eq!(network.app_user_ids(), vec![NodeId(2), NodeId(3)]);
    }

    #[test]
    fn test_state_mut() {
        let mut network = Network::new();
        network.insert_edge(NodeId(5), NodeId(6));
        network.allocate(NodeId(6), NodeState::default());

        network.state_mut(NodeId(6)).unwrap().app = true;
        assert!(network.state(NodeId(6)).unwrap().app);
        assert!(network.state_mut(NodeId(5)).is_none());
    }
}
