//! Topology Store
//!
//! Undirected simple graph over node IDs. Nodes and neighbor lists keep
//! first-insertion order so seeded runs visit them identically.

use rand::seq::index;
use rand::Rng;
use std::collections::{HashMap, HashSet};

use super::node::NodeId;

/// Canonical (low, high) key for an undirected edge between two slots.
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Undirected graph with no self-loops and no parallel edges
#[derive(Debug, Clone, Default)]
pub struct SocialGraph {
    /// Slot -> node ID, in insertion order
    ids: Vec<NodeId>,
    /// Node ID -> slot
    slots: HashMap<NodeId, usize>,
    /// Slot -> neighbor slots, in insertion order
    adjacency: Vec<Vec<usize>>,
    /// Edges in insertion order, canonical keys
    edges: Vec<(usize, usize)>,
    /// Membership index for `edges`
    edge_set: HashSet<(usize, usize)>,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Slot of a node, if present.
    pub fn slot_of(&self, id: NodeId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    /// Node ID stored in a slot.
    pub fn id_at(&self, slot: usize) -> Option<NodeId> {
        self.ids.get(slot).copied()
    }

    /// All node IDs in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    /// Adds a node if absent and returns its slot.
    pub fn add_node(&mut self, id: NodeId) -> usize {
        if let Some(&slot) = self.slots.get(&id) {
            return slot;
        }
        let slot = self.ids.len();
        self.ids.push(id);
        self.slots.insert(id, slot);
        self.adjacency.push(Vec::new());
        slot
    }

    /// Inserts an undirected edge, adding missing endpoints.
    ///
    /// Returns false for self-loops and for edges already present.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        let slot_a = self.add_node(a);
        let slot_b = self.add_node(b);
        self.link(slot_a, slot_b)
    }

    fn link(&mut self, slot_a: usize, slot_b: usize) -> bool {
        if slot_a == slot_b {
            return false;
        }
        let key = edge_key(slot_a, slot_b);
        if !self.edge_set.insert(key) {
            return false;
        }
        self.edges.push(key);
        self.adjacency[slot_a].push(slot_b);
        self.adjacency[slot_b].push(slot_a);
        true
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        match (self.slot_of(a), self.slot_of(b)) {
            (Some(slot_a), Some(slot_b)) => self.edge_set.contains(&edge_key(slot_a, slot_b)),
            _ => false,
        }
    }

    /// Removes an edge. Returns false if it was not present.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        let (Some(slot_a), Some(slot_b)) = (self.slot_of(a), self.slot_of(b)) else {
            return false;
        };
        let key = edge_key(slot_a, slot_b);
        if !self.edge_set.remove(&key) {
            return false;
        }
        self.edges.retain(|&e| e != key);
        self.unlink(key);
        true
    }

    fn unlink(&mut self, (slot_a, slot_b): (usize, usize)) {
        self.adjacency[slot_a].retain(|&n| n != slot_b);
        self.adjacency[slot_b].retain(|&n| n != slot_a);
    }

    /// Neighbors of a node in insertion order; empty for unknown IDs.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let slots = self.slot_of(id).map(|slot| self.neighbor_slots(slot)).unwrap_or(&[]);
        slots.iter().map(move |&n| self.ids[n])
    }

    /// Neighbor slots of a slot.
    pub(crate) fn neighbor_slots(&self, slot: usize) -> &[usize] {
        self.adjacency.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.slot_of(id).map(|slot| self.neighbor_slots(slot).len()).unwrap_or(0)
    }

    /// All edges as ID pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edges.iter().map(move |&(a, b)| (self.ids[a], self.ids[b]))
    }

    /// Deletes `floor(fraction * |edges|)` edges chosen uniformly without
    /// replacement. Returns the number removed.
    pub fn remove_random_edges<R: Rng + ?Sized>(&mut self, fraction: f64, rng: &mut R) -> usize {
        let total = self.edges.len();
        let amount = ((fraction.max(0.0) * total as f64).floor() as usize).min(total);
        if amount == 0 {
            return 0;
        }

        let doomed: HashSet<usize> = index::sample(rng, total, amount).into_iter().collect();
        let mut kept = Vec::with_capacity(total - amount);
        for (position, key) in std::mem::take(&mut self.edges).into_iter().enumerate() {
            if doomed.contains(&position) {
                self.edge_set.remove(&key);
                self.unlink(key);
            } else {
                kept.push(key);
            }
        }
        self.edges = kept;
        amount
    }

    /// Makes `count` attempts to link two distinct uniformly chosen nodes.
    /// Attempts that hit an existing edge are no-ops. Returns edges added.
    pub fn add_random_edges<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> usize {
        let nodes = self.ids.len();
        if nodes < 2 {
            return 0;
        }
        let mut added = 0;
        for _ in 0..count {
            let pair = index::sample(rng, nodes, 2);
            if self.link(pair.index(0), pair.index(1)) {
                added += 1;
            }
        }
        added
    }

    /// Local clustering coefficient of a node; 0 below degree 2.
    pub fn local_clustering(&self, id: NodeId) -> f64 {
        self.slot_of(id).map(|slot| self.clustering_at(slot)).unwrap_or(0.0)
    }

    fn clustering_at(&self, slot: usize) -> f64 {
        let neighbors = self.neighbor_slots(slot);
        let degree = neighbors.len();
        if degree < 2 {
            return 0.0;
        }
        let mut links = 0usize;
        for (i, &a) in neighbors.iter().enumerate() {
            for &b in &neighbors[i + 1..] {
                if self.edge_set.contains(&edge_key(a, b)) {
                    links += 1;
                }
            }
        }
        (2 * links) as f64 / (degree * (degree - 1)) as f64
    }

    /// Mean local clustering over all nodes. Empty graphs score 0.
    pub fn average_clustering(&self) -> f64 {
        if self.ids.is_empty() {
            return 0.0;
        }
        let total: f64 = (0..self.ids.len()).map(|slot| self.clustering_at(slot)).sum();
        total / self.ids.len() as f64
    }
}
